//! Then steps for board placement BDD scenarios.

use super::world::{BoardWorld, item_id};
use prodboard::board::{
    adapters::LocalBoardPersistence,
    domain::{Column, Stage, WorkItem},
    services::BoardServiceError,
};
use rstest_bdd_macros::then;
use std::sync::Arc;

fn find<'a>(world: &'a BoardWorld, name: &str) -> Result<&'a WorkItem, eyre::Report> {
    let id = item_id(name)?;
    world
        .board()?
        .state()
        .get(&id)
        .ok_or_else(|| eyre::eyre!("item '{name}' not on the board"))
}

#[then(r#"item "{name}" has order "{order}""#)]
fn item_has_order(world: &BoardWorld, name: String, order: String) -> Result<(), eyre::Report> {
    let expected: f64 = order
        .parse()
        .map_err(|err| eyre::eyre!("invalid order '{order}' in scenario: {err}"))?;
    let item = find(world, &name)?;
    if !item.order().total_cmp(&expected).is_eq() {
        return Err(eyre::eyre!(
            "expected order {expected} for '{name}', found {}",
            item.order()
        ));
    }
    Ok(())
}

#[then(r#"item "{name}" is in column "{column}" within stage "{stage}""#)]
fn item_in_column(
    world: &BoardWorld,
    name: String,
    column: String,
    stage: String,
) -> Result<(), eyre::Report> {
    let expected_column = Column::try_from(column.as_str())
        .map_err(|err| eyre::eyre!("invalid column in scenario: {err}"))?;
    let expected_stage = Stage::try_from(stage.as_str())
        .map_err(|err| eyre::eyre!("invalid stage in scenario: {err}"))?;
    let item = find(world, &name)?;
    if item.column() != expected_column || item.stage() != expected_stage {
        return Err(eyre::eyre!(
            "expected '{name}' in {expected_column}/{expected_stage}, found {}/{}",
            item.column(),
            item.stage()
        ));
    }
    Ok(())
}

#[then(r#"column "{column}" lists "{names}""#)]
fn column_lists(world: &BoardWorld, column: String, names: String) -> Result<(), eyre::Report> {
    let listed_column = Column::try_from(column.as_str())
        .map_err(|err| eyre::eyre!("invalid column in scenario: {err}"))?;
    let listed: Vec<String> = world
        .board()?
        .state()
        .column_items(listed_column)
        .iter()
        .map(|item| item.id().to_string())
        .collect();
    let expected: Vec<String> = names.split(',').map(|name| name.trim().to_owned()).collect();
    if listed != expected {
        return Err(eyre::eyre!("expected {expected:?} in {column}, found {listed:?}"));
    }
    Ok(())
}

#[then("the move is refused for lack of permission")]
fn move_refused(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_move
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing move result"))?;
    if !matches!(result, Err(BoardServiceError::Forbidden(_))) {
        return Err(eyre::eyre!("expected Forbidden error, got {result:?}"));
    }
    Ok(())
}

#[then("the board holds {count:usize} items")]
fn board_holds(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let held = world.board()?.state().len();
    if held != count {
        return Err(eyre::eyre!("expected {count} items on the board, found {held}"));
    }
    Ok(())
}

#[then("local storage holds {count:usize} items")]
fn storage_holds(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let stored = LocalBoardPersistence::new(Arc::clone(&world.store))
        .load(world.clock.as_ref())
        .ok_or_else(|| eyre::eyre!("no board stored locally"))?;
    if stored.len() != count {
        return Err(eyre::eyre!("expected {count} stored items, found {}", stored.len()));
    }
    Ok(())
}
