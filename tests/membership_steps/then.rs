//! Then steps for membership approval BDD scenarios.

use super::world::{MembershipWorld, run_async};
use eyre::WrapErr;
use prodboard::access::{
    domain::Role,
    services::{MembershipError, SessionError},
};
use rstest_bdd_macros::then;

fn pending_requests(world: &MembershipWorld, count: usize) -> Result<(), eyre::Report> {
    let pending = run_async(world.memberships.join_requests(Role::Admin))
        .wrap_err("list join requests")?;
    if pending.len() != count {
        return Err(eyre::eyre!(
            "expected {count} pending join requests, found {}",
            pending.len()
        ));
    }
    Ok(())
}

#[then("the administrator sees {count:usize} pending join request")]
fn one_pending_request(world: &MembershipWorld, count: usize) -> Result<(), eyre::Report> {
    pending_requests(world, count)
}

#[then("the administrator sees {count:usize} pending join requests")]
fn pending_request_count(world: &MembershipWorld, count: usize) -> Result<(), eyre::Report> {
    pending_requests(world, count)
}

#[then(r#""{user}" is a member with role "{role}""#)]
fn member_with_role(world: &MembershipWorld, user: String, role: String) -> Result<(), eyre::Report> {
    let expected =
        Role::try_from(role.as_str()).map_err(|err| eyre::eyre!("invalid role in scenario: {err}"))?;
    let members = run_async(world.memberships.members(Role::Admin)).wrap_err("list members")?;
    let member = members
        .iter()
        .find(|member| member.user_id.as_str() == user)
        .ok_or_else(|| eyre::eyre!("'{user}' is not a member"))?;
    if member.role != expected {
        return Err(eyre::eyre!("expected role {expected}, found {}", member.role));
    }
    Ok(())
}

#[then("the approval is refused for lack of permission")]
fn approval_refused(world: &MembershipWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_approval
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing approval result"))?;
    if !matches!(result, Err(MembershipError::Forbidden(_))) {
        return Err(eyre::eyre!("expected Forbidden error, got {result:?}"));
    }
    Ok(())
}

#[then("the sign-in is refused because a session is already active")]
fn sign_in_refused(world: &MembershipWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_sign_in
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing sign-in result"))?;
    if !matches!(result, Err(SessionError::AlreadyActive)) {
        return Err(eyre::eyre!("expected AlreadyActive error, got {result:?}"));
    }
    Ok(())
}

#[then("the sign-in succeeds")]
fn sign_in_succeeds(world: &MembershipWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_sign_in
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing sign-in result"))?;
    if let Err(err) = result {
        return Err(eyre::eyre!("expected sign-in to succeed, got {err}"));
    }
    Ok(())
}
