//! Given steps for membership approval BDD scenarios.

use super::world::{MembershipWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#""{user}" signs in from the "{browser}" browser"#)]
fn signed_in(world: &mut MembershipWorld, user: String, browser: String) -> Result<(), eyre::Report> {
    let session = world.browser(&browser, &user)?;
    let identity = run_async(session.sign_in()).wrap_err("sign in for scenario setup")?;
    world.signed_in.insert(user, identity);
    Ok(())
}
