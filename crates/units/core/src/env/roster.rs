use crate::state::{PlayerId, PlayerRecord};

/// Public player records.
pub trait RosterOracle: Send + Sync {
    fn player(&self, id: PlayerId) -> Option<&PlayerRecord>;
}
