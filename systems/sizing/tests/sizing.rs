use life_canvas_core::{CellSize, GridSize};
use life_canvas_system_sizing::{cell_size_for, ChromeReserve, ContainerBox, Sizing};

const NO_CHROME: ChromeReserve = ChromeReserve {
    padding_px: 0,
    controls_height_px: 0,
};

fn fits(size: u32, grid: GridSize, width: u32, height: u32) -> bool {
    let (canvas_width, canvas_height) = CellSize::new(size).canvas_extent(grid);
    canvas_width <= width && canvas_height <= height
}

#[test]
fn computed_size_is_the_largest_that_fits() {
    for (grid_width, grid_height) in [(64, 64), (10, 30), (128, 48), (7, 3)] {
        let grid = GridSize::new(grid_width, grid_height);
        for width in (50..900).step_by(37) {
            for height in (50..900).step_by(41) {
                let size = cell_size_for(
                    ContainerBox::new(width, height),
                    NO_CHROME,
                    grid,
                    CellSize::MIN,
                )
                .get();

                if size > CellSize::MIN.get() {
                    assert!(
                        fits(size, grid, width, height),
                        "{size}px cells should fit a {grid} grid into {width}x{height}",
                    );
                }
                assert!(
                    !fits(size + 1, grid, width, height),
                    "{}px cells should not fit a {grid} grid into {width}x{height}",
                    size + 1,
                );
            }
        }
    }
}

#[test]
fn chrome_is_subtracted_before_fitting() {
    let grid = GridSize::new(10, 10);
    let with_chrome = cell_size_for(
        ContainerBox::new(500, 500),
        ChromeReserve::default(),
        grid,
        CellSize::MIN,
    );
    let without_chrome = cell_size_for(
        ContainerBox::new(500 - 32, 500 - 32 - 120),
        NO_CHROME,
        grid,
        CellSize::MIN,
    );

    assert_eq!(with_chrome, without_chrome);
}

#[test]
fn resize_reports_only_changes() {
    let mut sizing = Sizing::default();
    let grid = GridSize::new(64, 64);

    assert_eq!(sizing.current(), CellSize::INITIAL);

    let first = sizing.resize(ContainerBox::new(1_200, 900), grid);
    assert_eq!(first, Some(CellSize::new(10)));
    assert_eq!(
        sizing.resize(ContainerBox::new(1_200, 900), grid),
        None,
        "same container should not report a change",
    );
    assert_eq!(sizing.current(), CellSize::new(10));
}
