use super::*;
use tactical::{House, InteractionMode, Surface};

const PLAYER: HouseId = HouseId(0);
const ENEMY: HouseId = HouseId(1);

fn new_display() -> Display {
    let mut display = Display::new(House::human(PLAYER, "Greece"), 640, 480);
    display.houses.add(House::new(ENEMY, "USSR"));
    display.set_view_dimensions(0, 0, Some(20), Some(15));
    display
}

fn started(save_path: PathBuf) -> (Skirmish, Display) {
    let mut skirmish = Skirmish::new(None, save_path).expect("embedded setup is valid");
    let mut display = new_display();
    skirmish.start(&mut display);
    (skirmish, display)
}

fn find(display: &Display, name: &str, owner: HouseId) -> ObjectId {
    display
        .objects
        .iter()
        .find(|(_, object)| object.class_of().name == name && object.owner() == owner)
        .map(|(id, _)| id)
        .expect("object spawned from setup")
}

fn run_ticks(skirmish: &mut Skirmish, display: &mut Display, ticks: usize) {
    for _ in 0..ticks {
        skirmish.update(display, 1.0 / 60.0);
    }
}

#[test]
fn embedded_setup_names_build_types() {
    let skirmish = Skirmish::new(None, PathBuf::from("unused.ini")).expect("setup");
    assert_eq!(skirmish.catalog.power.name, "powr");
    assert!(skirmish.catalog.wall.is_wall);
    assert_eq!(skirmish.setup.forces.len(), 12);
}

#[test]
fn setup_with_unknown_field_is_rejected() {
    let raw = r#"{ "types": [], "home": { "x": 1, "y": 1 }, "extra": true }"#;
    let error = parse_setup(raw).expect_err("unknown field");
    assert!(error.contains("unknown field"), "{error}");
}

#[test]
fn setup_error_names_the_bad_field() {
    let raw = r#"{ "types": [ { "key": 1, "name": "e1", "rtti": "ghost" } ], "home": { "x": 1, "y": 1 } }"#;
    let error = parse_setup(raw).expect_err("bad rtti");
    assert!(error.contains("types[0].rtti"), "{error}");
}

#[test]
fn catalog_rejects_duplicate_keys_and_missing_walls() {
    let rifle = ObjectType::new(TypeKey(1), "e1", Rtti::Infantry);
    let error = Catalog::new(&[rifle.clone(), rifle.clone()]).expect_err("duplicate");
    assert!(error.contains("types[1].key"), "{error}");

    let power = ObjectType {
        is_base: true,
        ..ObjectType::new(TypeKey(6), "powr", Rtti::Building)
    };
    let error = Catalog::new(&[rifle, power]).expect_err("no wall");
    assert!(error.contains("wall"), "{error}");
}

#[test]
fn start_spawns_forces_and_reveals_the_player_base() {
    let (skirmish, display) = started(PathBuf::from("unused.ini"));

    assert_eq!(display.objects.len(), 12);
    assert_eq!(skirmish.bodies.len(), 12);
    assert_eq!(display.layers.count(LayerKind::Air), 1);
    assert_eq!(display.waypoints.home(), Some(Cell::from_xy(22, 22)));

    assert!(display.map.is_mapped(Cell::from_xy(21, 21), PLAYER));
    assert!(!display.map.is_mapped(Cell::from_xy(44, 34), PLAYER));
    assert!(display.cell_building(Cell::from_xy(21, 20)).is_some());

    let wall = display.map.cell(Cell::from_xy(40, 28)).expect("on map");
    assert!(wall.flags.contains(CellFlags::WALL));
    assert_eq!(wall.owner, Some(ENEMY));

    let lake = display.map.cell(Cell::from_xy(58, 46)).expect("on map");
    assert!(lake.template >= WATER_TEMPLATE_BASE);
}

#[test]
fn move_order_walks_the_unit_and_updates_occupancy() {
    let (mut skirmish, mut display) = started(PathBuf::from("unused.ini"));
    let tank = find(&display, "2tnk", PLAYER);
    let dest = Cell::from_xy(30, 24);

    display
        .objects
        .get_mut(tank)
        .expect("tank")
        .active_click_with(Action::Move, Target::Cell(dest), &ClickContext::default());
    run_ticks(&mut skirmish, &mut display, 120);

    let body = skirmish.bodies[&tank].borrow();
    assert_eq!(body.coord, dest.coord());
    assert_eq!(body.destination, None);
    drop(body);
    let state = display.map.cell(dest).expect("on map");
    assert!(state.occupiers.contains(&tank));
    assert!(display.map.is_mapped(Cell::from_xy(32, 24), PLAYER));
}

#[test]
fn attack_order_closes_to_weapon_range() {
    let (mut skirmish, mut display) = started(PathBuf::from("unused.ini"));
    let tank = find(&display, "2tnk", PLAYER);
    let enemy = find(&display, "2tnk", ENEMY);

    display
        .objects
        .get_mut(tank)
        .expect("tank")
        .active_click_with(Action::Attack, Target::Object(enemy), &ClickContext::default());
    run_ticks(&mut skirmish, &mut display, 400);

    let body = skirmish.bodies[&tank].borrow();
    let target = skirmish.bodies[&enemy].borrow().coord;
    assert!(distance(body.coord, target) <= body.range);
    assert_eq!(body.destination, None);
    assert_eq!(body.attack_target, Some(Target::Object(enemy)));
}

#[test]
fn attack_on_a_sold_target_is_dropped() {
    let (mut skirmish, mut display) = started(PathBuf::from("unused.ini"));
    let tank = find(&display, "2tnk", PLAYER);
    let enemy = find(&display, "e1", ENEMY);

    display
        .objects
        .get_mut(tank)
        .expect("tank")
        .active_click_with(Action::Attack, Target::Object(enemy), &ClickContext::default());
    skirmish.handle_event(&mut display, OutgoingEvent::Sell(enemy));
    run_ticks(&mut skirmish, &mut display, 1);

    assert!(display.objects.get(enemy).is_none());
    assert!(!skirmish.bodies.contains_key(&enemy));
    assert_eq!(skirmish.bodies[&tank].borrow().attack_target, None);
}

#[test]
fn formation_moves_at_the_slowest_member_speed() {
    let (skirmish, mut display) = started(PathBuf::from("unused.ini"));
    let tank = find(&display, "2tnk", PLAYER);
    let context = ClickContext {
        allow_voice: false,
        formation: Some(tactical::FormationMove {
            group: 1,
            max_speed: 4,
        }),
    };

    let object = display.objects.get_mut(tank).expect("tank");
    assert_eq!(object.group(), 1);
    object.active_click_with(Action::Move, Target::Cell(Cell::from_xy(30, 30)), &context);

    let body = skirmish.bodies[&tank].borrow();
    assert_eq!(body.speed, 4 * LEPTONS_PER_SPEED_POINT);
    assert_eq!(body.destination, Some(Cell::from_xy(30, 30).coord()));
}

#[test]
fn objects_answer_clicks_by_ownership() {
    let (_skirmish, display) = started(PathBuf::from("unused.ini"));
    let tank = display.objects.get(find(&display, "2tnk", PLAYER)).expect("tank");
    let harvester = display.objects.get(find(&display, "harv", PLAYER)).expect("harv");
    let yard = display.objects.get(find(&display, "fact", PLAYER)).expect("yard");
    let enemy = display
        .target_info(find(&display, "2tnk", ENEMY))
        .expect("enemy info");
    let friend = display
        .target_info(find(&display, "e1", PLAYER))
        .expect("friend info");
    let ground = TargetInfo::cell(Cell::from_xy(30, 30));

    assert_eq!(tank.what_action(&enemy), Action::Attack);
    assert_eq!(tank.what_action(&friend), Action::Select);
    assert_eq!(tank.what_action(&ground), Action::Move);
    assert_eq!(harvester.what_action(&enemy), Action::Select);
    assert_eq!(yard.what_action(&ground), Action::None);
    assert!(yard.can_repair());
}

#[test]
fn placing_a_power_plant_spawns_a_building() {
    let (mut skirmish, mut display) = started(PathBuf::from("unused.ini"));
    skirmish.key_pressed(&mut display, KeyCode::KeyB);
    assert!(display.interaction.mode.pending().is_some());

    let cell = Cell::from_xy(24, 22);
    skirmish.handle_event(
        &mut display,
        OutgoingEvent::Place {
            rtti: Rtti::Building,
            kind: TypeKey(6),
            cell,
        },
    );

    assert!(display.interaction.mode.is_normal());
    let id = display.cell_building(cell.offset(129)).expect("2x2 building");
    assert_eq!(display.objects.get(id).expect("placed").owner(), PLAYER);
    assert_eq!(display.objects.len(), 13);
}

#[test]
fn walls_are_built_and_sold_by_cell() {
    let (mut skirmish, mut display) = started(PathBuf::from("unused.ini"));
    let cell = Cell::from_xy(25, 26);
    skirmish.handle_event(
        &mut display,
        OutgoingEvent::Place {
            rtti: Rtti::Building,
            kind: TypeKey(7),
            cell,
        },
    );
    let state = display.map.cell(cell).expect("on map");
    assert!(state.flags.contains(CellFlags::WALL));
    assert_eq!(state.owner, Some(PLAYER));
    assert_eq!(display.objects.len(), 12);

    skirmish.handle_event(&mut display, OutgoingEvent::SellCell(cell));
    let state = display.map.cell(cell).expect("on map");
    assert!(!state.flags.contains(CellFlags::WALL));
    assert!(!state.vehicle_blocked);
}

#[test]
fn hotkeys_switch_interaction_modes() {
    let (mut skirmish, mut display) = started(PathBuf::from("unused.ini"));

    skirmish.key_pressed(&mut display, KeyCode::KeyS);
    assert!(matches!(display.interaction.mode, InteractionMode::Sell));
    skirmish.key_pressed(&mut display, KeyCode::KeyS);
    assert!(display.interaction.mode.is_normal());

    skirmish.key_pressed(&mut display, KeyCode::KeyR);
    assert!(matches!(display.interaction.mode, InteractionMode::Repair));
    skirmish.key_pressed(&mut display, KeyCode::KeyR);

    skirmish.key_pressed(&mut display, KeyCode::KeyN);
    assert_eq!(
        display.interaction.mode.targeting(),
        Some(SpecialWeapon::NuclearBomb)
    );
}

#[test]
fn tab_selects_the_next_player_object() {
    let (mut skirmish, mut display) = started(PathBuf::from("unused.ini"));
    assert!(display.selected().is_empty());

    skirmish.key_pressed(&mut display, KeyCode::Tab);
    let first = display.selected().to_vec();
    assert_eq!(first.len(), 1);
    assert!(skirmish.bodies[&first[0]].borrow().selected);

    skirmish.key_pressed(&mut display, KeyCode::Tab);
    assert_eq!(display.selected().len(), 1);
    assert_ne!(display.selected(), first.as_slice());
    assert!(!skirmish.bodies[&first[0]].borrow().selected);
}

#[test]
fn reshroud_hotkey_keeps_only_what_forces_see() {
    let (mut skirmish, mut display) = started(PathBuf::from("unused.ini"));
    display.sight_from(Cell::from_xy(60, 60), 3, PLAYER);
    assert!(display.map.is_mapped(Cell::from_xy(60, 60), PLAYER));

    skirmish.key_pressed(&mut display, KeyCode::KeyG);
    assert!(!display.map.is_mapped(Cell::from_xy(60, 60), PLAYER));
    assert!(display.map.is_mapped(Cell::from_xy(21, 21), PLAYER));
}

#[test]
fn saved_scenario_reloads_the_map() {
    let dir = tempfile::tempdir().expect("tempdir");
    let save = dir.path().join("skirmish.ini");
    let (mut skirmish, mut display) = started(save.clone());
    skirmish.key_pressed(&mut display, KeyCode::F5);
    assert!(save.exists());

    let mut reloaded = Skirmish::new(Some(save), PathBuf::from("unused.ini")).expect("setup");
    let mut fresh = new_display();
    reloaded.start(&mut fresh);

    assert_eq!(fresh.waypoints.home(), Some(Cell::from_xy(22, 22)));
    let lake = fresh.map.cell(Cell::from_xy(58, 46)).expect("on map");
    assert!(lake.template >= WATER_TEMPLATE_BASE);
    assert_eq!(fresh.objects.len(), 12);
}

#[test]
fn missing_scenario_file_falls_back_to_generated_terrain() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut skirmish =
        Skirmish::new(Some(dir.path().join("absent.ini")), PathBuf::from("unused.ini"))
            .expect("setup");
    let mut display = new_display();
    skirmish.start(&mut display);

    assert_eq!(display.waypoints.home(), Some(Cell::from_xy(22, 22)));
    assert_eq!(display.objects.len(), 12);
}

#[test]
fn frame_draws_the_skirmish() {
    let (_skirmish, mut display) = started(PathBuf::from("unused.ini"));
    let mut surface = Surface::new(640, 480);
    let stats = display.draw_it(&mut surface, true);
    assert!(stats.full_redraw);
    assert!(stats.cells_redrawn > 0);
}

#[test]
fn step_toward_lands_on_the_destination() {
    let from = Cell::from_xy(10, 10).coord();
    let dest = Cell::from_xy(12, 10).coord();

    let first = step_toward(from, dest, 300);
    assert_eq!(first.x() - from.x(), 300);
    assert_eq!(first.y(), from.y());
    assert_eq!(step_toward(first, dest, 300), dest);
    assert_eq!(step_toward(from, dest, 0), from);
}
