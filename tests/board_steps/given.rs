//! Given steps for board placement BDD scenarios.

use super::world::{BoardWorld, item_id};
use mockable::Clock;
use prodboard::access::domain::Role;
use prodboard::board::{
    adapters::LocalBoardPersistence,
    domain::{Column, WorkItem, WorkItemDetails},
    services::BoardService,
};
use rstest_bdd_macros::given;
use std::sync::Arc;

fn open_with_role(world: &mut BoardWorld, code: &str) -> Result<(), eyre::Report> {
    let role = Role::try_from(code).map_err(|err| eyre::eyre!("invalid role in scenario: {err}"))?;
    let persistence = Arc::new(LocalBoardPersistence::new(Arc::clone(&world.store)));
    world.board = Some(BoardService::new(
        persistence,
        Arc::clone(&world.clock),
        Some(role),
    ));
    Ok(())
}

#[given(r#"a board where the user is an "{role}""#)]
fn board_for_role(world: &mut BoardWorld, role: String) -> Result<(), eyre::Report> {
    open_with_role(world, &role)
}

#[given(r#"a board where the user is a "{role}""#)]
fn board_for_role_a(world: &mut BoardWorld, role: String) -> Result<(), eyre::Report> {
    open_with_role(world, &role)
}

#[given(r#"item "{name}" sits in column "{column}" at order {order:u32}"#)]
fn item_in_column(
    world: &mut BoardWorld,
    name: String,
    column: String,
    order: u32,
) -> Result<(), eyre::Report> {
    let destination = Column::try_from(column.as_str())
        .map_err(|err| eyre::eyre!("invalid column in scenario: {err}"))?;
    let details = WorkItemDetails::new(name.as_str(), 10, world.clock.utc().date_naive());
    let item = WorkItem::create(
        item_id(&name)?,
        details,
        destination,
        f64::from(order),
        &*world.clock,
    );
    let board = world.board_mut()?;
    let mut items = board.state().items().to_vec();
    items.push(item);
    board.replace_with_snapshot(items);
    Ok(())
}

#[given("local storage holding no board")]
fn empty_local_storage(world: &mut BoardWorld) {
    world.board = None;
}
