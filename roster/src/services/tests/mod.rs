//! Service-specific tests
//!
//! Each service has its own test file; shared helpers live in `common`.

mod file_storage;
mod persistence;

pub mod common {
    use shared::{Player, Role};

    use crate::core::{RosterCommand, RosterStore};

    /// Store holding `count` tank players added through dispatch
    pub fn populated_store(count: usize) -> RosterStore {
        let mut store = RosterStore::default();
        for i in 0..count {
            let player = Player::new(format!("Player {i}")).with_role(Role::Tank, 2000 + i as u32 * 100, 0);
            store
                .dispatch(RosterCommand::AddPlayer {
                    player,
                    pool: shared::Pool::Players,
                })
                .expect("add player");
        }
        store
    }
}
