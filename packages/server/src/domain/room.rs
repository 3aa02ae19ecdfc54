//! Room index: pure functions deriving per-room views from the connection registry.
//!
//! A room is never stored; it is the set of connections sharing a room id at
//! the moment one of these functions runs.

use std::collections::HashMap;

use super::{
    entity::{ActiveUser, Connection},
    value_object::{ConnectionId, RoomId, UserId, Username},
};

/// Build the active-user view of a room.
///
/// Entries are deduplicated by user id; when several connections share a user
/// id, the display name with the highest revision wins. The result is sorted by
/// user id for consistent ordering.
pub fn active_users_in<'a, I>(connections: I, room_id: &RoomId) -> Vec<ActiveUser>
where
    I: IntoIterator<Item = &'a Connection>,
{
    let mut latest: HashMap<&UserId, (u64, &Username)> = HashMap::new();

    for connection in connections {
        let Some(membership) = connection.membership() else {
            continue;
        };
        if &membership.room_id != room_id {
            continue;
        }
        latest
            .entry(&membership.user_id)
            .and_modify(|entry| {
                if connection.revision >= entry.0 {
                    *entry = (connection.revision, &membership.username);
                }
            })
            .or_insert((connection.revision, &membership.username));
    }

    let mut users: Vec<ActiveUser> = latest
        .into_iter()
        .map(|(user_id, (_, username))| ActiveUser {
            user_id: user_id.clone(),
            username: username.clone(),
        })
        .collect();
    users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
    users
}

/// Get broadcast targets: every registered connection in the room, minus the excluded one.
///
/// The liveness flag only decides eviction; a connection awaiting its pong still
/// receives room traffic until it is removed.
pub fn broadcast_targets<'a, I>(
    connections: I,
    room_id: &RoomId,
    exclude: Option<&ConnectionId>,
) -> Vec<ConnectionId>
where
    I: IntoIterator<Item = &'a Connection>,
{
    connections
        .into_iter()
        .filter(|connection| connection.is_in_room(room_id))
        .filter(|connection| Some(&connection.id) != exclude)
        .map(|connection| connection.id)
        .collect()
}
