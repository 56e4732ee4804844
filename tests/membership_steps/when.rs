//! When steps for membership approval BDD scenarios.

use super::world::{MembershipWorld, run_async};
use eyre::WrapErr;
use prodboard::access::domain::{Role, UserId};
use rstest_bdd_macros::when;

fn parse_role(raw: &str) -> Result<Role, eyre::Report> {
    Role::try_from(raw).map_err(|err| eyre::eyre!("invalid role in scenario: {err}"))
}

#[when(r#""{user}" requests access to the board"#)]
fn requests_access(world: &mut MembershipWorld, user: String) -> Result<(), eyre::Report> {
    let identity = world
        .signed_in
        .get(&user)
        .ok_or_else(|| eyre::eyre!("'{user}' has not signed in"))?;
    run_async(world.memberships.request_access(identity)).wrap_err("request access")?;
    Ok(())
}

#[when(r#"an "{actor}" approves "{user}" as "{role}""#)]
fn approves(
    world: &mut MembershipWorld,
    actor: String,
    user: String,
    role: String,
) -> Result<(), eyre::Report> {
    let acting = parse_role(&actor)?;
    let granted = parse_role(&role)?;
    let user_id = UserId::new(user).map_err(|err| eyre::eyre!("invalid user: {err}"))?;
    let result = run_async(world.memberships.approve(acting, &user_id, granted));
    world.last_approval = Some(result);
    Ok(())
}

#[when(r#""{user}" signs in from the "{browser}" browser"#)]
fn signs_in(world: &mut MembershipWorld, user: String, browser: String) -> Result<(), eyre::Report> {
    let session = world.browser(&browser, &user)?;
    let result = run_async(session.sign_in());
    world.last_sign_in = Some(result);
    Ok(())
}

#[when(r#""{user}" signs out of the "{browser}" browser"#)]
fn signs_out(world: &mut MembershipWorld, user: String, browser: String) -> Result<(), eyre::Report> {
    let session = world.browser(&browser, &user)?;
    run_async(session.sign_out()).wrap_err("sign out")?;
    world.signed_in.remove(&user);
    Ok(())
}
