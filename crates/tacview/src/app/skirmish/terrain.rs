const LAKE_CENTER: (i32, i32) = (58, 46);
const LAKE_RADIUS: i32 = 7;
const GROUND_TEMPLATES: u16 = 4;

/// Fills the playable area with ground tiles, a lake and the setup's walls,
/// and drops the home waypoint.
fn generate_terrain(display: &mut Display, setup: &SkirmishSetup) {
    display.init_clear();
    let bounds = display.map.bounds();
    for y in bounds.y..bounds.y + bounds.height {
        for x in bounds.x..bounds.x + bounds.width {
            let Some(state) = display.map.cell_mut(Cell::from_xy(x, y)) else {
                continue;
            };
            let (dx, dy) = (x - LAKE_CENTER.0, y - LAKE_CENTER.1);
            if dx * dx + dy * dy <= LAKE_RADIUS * LAKE_RADIUS {
                state.template = WATER_TEMPLATE_BASE;
                state.vehicle_blocked = true;
            } else {
                state.template = ((x * 7 + y * 13) as u16) % GROUND_TEMPLATES;
            }
            state.icon = ((x + y) % 3) as u8;
        }
    }

    for run in &setup.walls {
        for step in 0..run.length.max(0) {
            build_wall(display, Cell::from_xy(run.x + step, run.y), HouseId(run.house));
        }
    }

    let home = Cell::from_xy(setup.home.x, setup.home.y);
    display.waypoints.set(WAYPT_HOME, Some(home));
    if let Some(state) = display.map.cell_mut(home) {
        state.flags.insert(CellFlags::WAYPOINT);
    }
    display.redraw.flag_all();
    info!(
        width = bounds.width,
        height = bounds.height,
        walls = setup.walls.len(),
        "terrain_generated"
    );
}

fn build_wall(display: &mut Display, cell: Cell, owner: HouseId) {
    let Some(state) = display.map.cell_mut(cell) else {
        return;
    };
    state.flags.insert(CellFlags::WALL);
    state.owner = Some(owner);
    state.vehicle_blocked = true;
    display.flag_cell(cell);
}
