//! When steps for board placement BDD scenarios.

use super::world::{BoardWorld, item_id, run_async};
use prodboard::board::{
    adapters::LocalBoardPersistence,
    domain::{Column, DropTarget},
    services::BoardService,
};
use rstest_bdd_macros::when;
use std::sync::Arc;

fn drop_item(world: &mut BoardWorld, name: &str, target: &DropTarget) -> Result<(), eyre::Report> {
    let id = item_id(name)?;
    let board = world.board_mut()?;
    let result = run_async(board.move_item(&id, target));
    world.last_move = Some(result);
    Ok(())
}

#[when(r#"item "{name}" is dropped before item "{target}""#)]
fn dropped_before(world: &mut BoardWorld, name: String, target: String) -> Result<(), eyre::Report> {
    let before = DropTarget::Before(item_id(&target)?);
    drop_item(world, &name, &before)
}

#[when(r#"item "{name}" is dropped at the top of column "{column}""#)]
fn dropped_on_column(
    world: &mut BoardWorld,
    name: String,
    column: String,
) -> Result<(), eyre::Report> {
    let destination = Column::try_from(column.as_str())
        .map_err(|err| eyre::eyre!("invalid column in scenario: {err}"))?;
    drop_item(world, &name, &DropTarget::ColumnTop(destination))
}

#[when("the local board is opened")]
fn local_board_opened(world: &mut BoardWorld) {
    let persistence = Arc::new(LocalBoardPersistence::new(Arc::clone(&world.store)));
    world.board = Some(BoardService::open_local(persistence, Arc::clone(&world.clock)));
}
