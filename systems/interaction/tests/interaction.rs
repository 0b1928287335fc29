use std::sync::Arc;

use glam::Vec2;
use life_canvas_core::{
    CellCoord, CellSize, CellState, CellStates, Command, GridSize, InteractionMode, Pattern,
    PatternCategory,
};
use life_canvas_system_interaction::{stamp, Interaction, PointerInput, PointerSample};

const CELL: CellSize = CellSize::new(8);

fn glider() -> Arc<Pattern> {
    Arc::new(
        Pattern::from_rows(
            "Glider",
            PatternCategory::Spaceship,
            &[[0u8, 1, 0], [0, 0, 1], [1, 1, 1]],
        )
        .expect("glider is rectangular"),
    )
}

fn sample_at(cell: CellCoord, grid: GridSize) -> PointerSample {
    let pitch = CELL.pitch() as f32;
    let (width, height) = CELL.canvas_extent(grid);
    PointerSample::unscaled(
        Vec2::new(
            cell.column() as f32 * pitch + 2.0,
            cell.row() as f32 * pitch + 2.0,
        ),
        Vec2::new(width as f32, height as f32),
    )
}

fn apply(bytes: &mut [u8], grid: GridSize, commands: &[Command]) {
    for command in commands {
        if let Command::SetCell { cell, state } = command {
            let index = grid.index(*cell).expect("commands stay inside the grid");
            bytes[index] = state.to_byte();
        }
    }
}

#[test]
fn glider_placed_at_origin_sets_five_cells() {
    let grid = GridSize::new(64, 64);
    let mut bytes = vec![0u8; grid.cell_count()];
    let mode = InteractionMode::Placement {
        pattern: glider(),
        preview: Some(CellCoord::new(0, 0)),
    };
    let mut commands = Vec::new();

    {
        let view = CellStates::from_bytes(&bytes, grid).expect("length matches");
        Interaction::new().handle(
            &mode,
            PointerInput::Click(sample_at(CellCoord::new(0, 0), grid)),
            CELL,
            Some(&view),
            &mut commands,
        );
    }
    apply(&mut bytes, grid, &commands);

    let view = CellStates::from_bytes(&bytes, grid).expect("length matches");
    let alive: Vec<CellCoord> = view
        .iter()
        .filter(|(_, state)| state.is_alive())
        .map(|(cell, _)| cell)
        .collect();
    assert_eq!(
        alive,
        vec![
            CellCoord::new(0, 1),
            CellCoord::new(1, 2),
            CellCoord::new(2, 0),
            CellCoord::new(2, 1),
            CellCoord::new(2, 2),
        ],
    );
    assert_eq!(
        &commands[commands.len() - 2..],
        &[Command::ExitPlacement, Command::Render],
        "placement is one-shot and forces a render",
    );
}

#[test]
fn placement_near_corner_is_clipped() {
    let grid = GridSize::new(8, 6);
    let mut commands = Vec::new();

    stamp(&glider(), CellCoord::new(5, 7), grid, &mut commands);

    let targets: Vec<CellCoord> = commands
        .iter()
        .filter_map(|command| match command {
            Command::SetCell { cell, .. } => Some(*cell),
            _ => None,
        })
        .collect();
    assert_eq!(targets, vec![CellCoord::new(5, 7)], "only the anchor cell is inside");
    assert!(targets.iter().all(|cell| grid.contains(*cell)));
}

#[test]
fn dead_pattern_cells_overwrite_live_cells() {
    let grid = GridSize::new(4, 4);
    let mut commands = Vec::new();

    stamp(&glider(), CellCoord::new(0, 0), grid, &mut commands);

    assert!(commands.contains(&Command::SetCell {
        cell: CellCoord::new(0, 0),
        state: CellState::Dead,
    }));
    assert_eq!(commands.len(), 9);
}

#[test]
fn toggling_twice_restores_the_cell() {
    let grid = GridSize::new(16, 16);
    let mut bytes = vec![0u8; grid.cell_count()];
    let target = CellCoord::new(3, 9);
    let interaction = Interaction::new();

    for expected in [CellState::Alive, CellState::Dead] {
        let mut commands = Vec::new();
        {
            let view = CellStates::from_bytes(&bytes, grid).expect("length matches");
            interaction.handle(
                &InteractionMode::Toggle,
                PointerInput::Click(sample_at(target, grid)),
                CELL,
                Some(&view),
                &mut commands,
            );
        }
        apply(&mut bytes, grid, &commands);

        let view = CellStates::from_bytes(&bytes, grid).expect("length matches");
        assert_eq!(view.get(target), expected);
        assert_eq!(commands.last(), Some(&Command::Render));
    }
}

#[test]
fn hover_updates_preview_only_in_placement_mode() {
    let grid = GridSize::new(16, 16);
    let bytes = vec![0u8; grid.cell_count()];
    let view = CellStates::from_bytes(&bytes, grid).expect("length matches");
    let interaction = Interaction::new();
    let hover = PointerInput::Move(sample_at(CellCoord::new(4, 5), grid));

    let mut commands = Vec::new();
    interaction.handle(&InteractionMode::Toggle, hover, CELL, Some(&view), &mut commands);
    assert!(commands.is_empty(), "toggle mode ignores pointer movement");

    interaction.handle(
        &InteractionMode::placing(glider()),
        hover,
        CELL,
        Some(&view),
        &mut commands,
    );
    assert_eq!(
        commands,
        vec![
            Command::SetPreview {
                cell: Some(CellCoord::new(4, 5)),
            },
            Command::Render,
        ],
    );

    commands.clear();
    interaction.handle(
        &InteractionMode::Placement {
            pattern: glider(),
            preview: Some(CellCoord::new(4, 5)),
        },
        PointerInput::Leave,
        CELL,
        Some(&view),
        &mut commands,
    );
    assert_eq!(commands, vec![Command::SetPreview { cell: None }, Command::Render]);
}

#[test]
fn nothing_happens_before_the_engine_is_ready() {
    let mut commands = Vec::new();

    Interaction::new().handle(
        &InteractionMode::Toggle,
        PointerInput::Click(sample_at(CellCoord::new(0, 0), GridSize::new(4, 4))),
        CELL,
        None,
        &mut commands,
    );

    assert!(commands.is_empty());
}
