//! Demo household for in-memory storage
//!
//! In-memory storage has no room directory to read from, so the server
//! seeds one household at startup and issues a bearer token per member.

use core_kernel::{Currency, MemberId};
use domain_ledger::{InMemoryRooms, Member, Room};

use crate::auth::{create_token, AuthError};
use crate::config::ApiConfig;

/// A seeded member and the token that authenticates them
#[derive(Debug, Clone)]
pub struct DemoMember {
    pub member: Member,
    pub token: String,
}

/// The seeded room; the first member is its owner
#[derive(Debug, Clone)]
pub struct DemoHousehold {
    pub room: Room,
    pub members: Vec<DemoMember>,
}

const DEMO_NAMES: [&str; 3] = ["Asha", "Ravi", "Meera"];

/// Seeds the demo household into `rooms`
///
/// # Errors
///
/// `AuthError::InvalidToken` if a token cannot be signed with the
/// configured secret
pub async fn seed_demo_household(
    rooms: &InMemoryRooms,
    config: &ApiConfig,
) -> Result<DemoHousehold, AuthError> {
    let members: Vec<Member> = DEMO_NAMES
        .iter()
        .map(|name| Member::new(MemberId::new(), *name))
        .collect();

    let room = members[1..]
        .iter()
        .fold(
            Room::new("Demo household", members[0].clone(), Currency::INR),
            |room, member| room.with_member(member.clone()),
        );
    rooms.upsert(room.clone()).await;

    let members = members
        .into_iter()
        .map(|member| -> Result<DemoMember, AuthError> {
            let token = create_token(member.id, &config.jwt_secret, config.jwt_expiration_secs)?;
            Ok(DemoMember { member, token })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DemoHousehold { room, members })
}
