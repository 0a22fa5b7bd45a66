use std::cell::RefCell;
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use serde::Deserialize;
use tactical::coord::{distance, CELL_LEPTON_W};
use tactical::rendering::{house_color, Canvas, WATER_TEMPLATE_BASE, WHITE};
use tactical::object::NO_GROUP;
use tactical::scenario::WAYPT_HOME;
use tactical::{
    Action, Cell, CellFlags, ClickContext, Coordinate, Display, HouseId, IniStore, KeyCode,
    LayerKind, ModeControl, ObjectId, ObjectType, OutgoingEvent, Rtti, SpecialWeapon,
    TacticalGame, TacticalObject, Target, TargetInfo, TypeKey, TypeRef,
};
use tracing::{debug, info, warn};

const SETUP_JSON: &str = include_str!("setup.json");
const SCENARIO_ENV_VAR: &str = "TACVIEW_SCENARIO";
const SAVE_ENV_VAR: &str = "TACVIEW_SAVE";
const DEFAULT_SAVE_FILE: &str = "tacview_scenario.ini";
/// Leptons travelled per tick for each point of an object type's speed.
const LEPTONS_PER_SPEED_POINT: i32 = 3;
const AIRCRAFT_ALTITUDE: i32 = 256;

include!("catalog.rs");
include!("units.rs");
include!("terrain.rs");

pub(crate) struct Skirmish {
    setup: SkirmishSetup,
    catalog: Catalog,
    bodies: BTreeMap<ObjectId, Rc<RefCell<Body>>>,
    scenario_path: Option<PathBuf>,
    save_path: PathBuf,
}

impl Skirmish {
    pub(crate) fn from_env() -> Result<Self, String> {
        let scenario_path = env::var(SCENARIO_ENV_VAR).ok().map(PathBuf::from);
        let save_path = env::var(SAVE_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SAVE_FILE));
        Self::new(scenario_path, save_path)
    }

    pub(crate) fn new(scenario_path: Option<PathBuf>, save_path: PathBuf) -> Result<Self, String> {
        let setup = parse_setup(SETUP_JSON)?;
        let catalog = Catalog::new(&setup.types)?;
        Ok(Self {
            setup,
            catalog,
            bodies: BTreeMap::new(),
            scenario_path,
            save_path,
        })
    }

    fn load_map(&self, display: &mut Display) {
        if let Some(path) = &self.scenario_path {
            let loaded = IniStore::load(path)
                .map_err(|error| error.to_string())
                .and_then(|ini| display.read_ini(&ini).map_err(|error| error.to_string()));
            match loaded {
                Ok(()) => {
                    info!(path = %path.display(), "scenario_loaded");
                    return;
                }
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "scenario_load_failed");
                }
            }
        }
        generate_terrain(display, &self.setup);
    }

    fn spawn_forces(&mut self, display: &mut Display) {
        for force in &self.setup.forces {
            let Some(kind) = self.catalog.get(TypeKey(force.kind)) else {
                warn!(kind = force.kind, "unknown_force_type");
                continue;
            };
            let cell = Cell::from_xy(force.x, force.y);
            let id = spawn(
                display,
                &mut self.bodies,
                kind,
                HouseId(force.house),
                cell,
                force.group.unwrap_or(NO_GROUP),
            );
            debug!(id = id.0, kind = force.kind, cell = cell.0, "force_spawned");
        }
    }

    fn handle_event(&mut self, display: &mut Display, event: OutgoingEvent) {
        match event {
            OutgoingEvent::Place { kind, cell, .. } => {
                let Some(kind) = self.catalog.get(kind) else {
                    warn!(kind = kind.0, "unknown_placement_type");
                    return;
                };
                let player = display.player();
                if kind.is_wall {
                    build_wall(display, cell, player);
                } else {
                    spawn(display, &mut self.bodies, kind, player, cell, NO_GROUP);
                    let sight = display_sight(display, cell);
                    display.sight_from(cell, sight, player);
                }
                display.clear_pending_placement();
                info!(cell = cell.0, "structure_placed");
            }
            OutgoingEvent::Sell(id) => {
                if display.remove_object(id).is_some() {
                    self.bodies.remove(&id);
                    display.redraw.request();
                    info!(id = id.0, "object_sold");
                }
            }
            OutgoingEvent::SellCell(cell) => {
                if let Some(state) = display.map.cell_mut(cell) {
                    state.flags.remove(CellFlags::WALL);
                    state.owner = None;
                    state.vehicle_blocked = false;
                }
                display.flag_cell(cell);
                info!(cell = cell.0, "wall_sold");
            }
            OutgoingEvent::Repair(id) => info!(id = id.0, "repair_started"),
            OutgoingEvent::SpecialPlace { weapon, cell } => {
                info!(weapon = ?weapon, cell = cell.0, "special_weapon_fired");
            }
        }
    }

    fn step_units(&mut self, display: &mut Display) {
        let positions: BTreeMap<ObjectId, Coordinate> = self
            .bodies
            .iter()
            .map(|(id, body)| (*id, body.borrow().coord))
            .collect();

        for (id, body) in &self.bodies {
            let step = {
                let mut body = body.borrow_mut();
                if let Some(target) = body.attack_target {
                    let target_coord = match target {
                        Target::Object(other) => positions.get(&other).copied(),
                        Target::Cell(cell) => Some(cell.coord()),
                    };
                    match target_coord {
                        Some(coord) if distance(body.coord, coord) <= body.range => {
                            body.destination = None;
                        }
                        Some(coord) => body.destination = Some(coord),
                        None => {
                            body.attack_target = None;
                            body.destination = None;
                        }
                    }
                }
                body.destination.map(|dest| (body.coord, dest, body.speed))
            };
            let Some((from, dest, speed)) = step else {
                continue;
            };
            let next = step_toward(from, dest, speed);
            let old_cell = from.cell();
            display.relocate(*id, |_| {
                let mut body = body.borrow_mut();
                body.coord = next;
                if next == dest {
                    body.destination = None;
                }
            });
            display.redraw.request();

            let (owner, sight) = {
                let body = body.borrow();
                (body.owner, body.sight)
            };
            if next.cell() != old_cell {
                display.sight_from(next.cell(), sight, owner);
            }
        }
    }

    fn save_scenario(&self, display: &Display) {
        let mut ini = IniStore::default();
        ini.put_string("Basic", "Name", "Tacview Skirmish");
        display.write_ini(&mut ini);
        match ini.save(&self.save_path) {
            Ok(()) => info!(path = %self.save_path.display(), "scenario_saved"),
            Err(error) => warn!(error = %error, "scenario_save_failed"),
        }
    }

    fn select_next(&self, display: &mut Display) {
        let current = display.selected().first().copied();
        let Some(next) = display.next_object(current) else {
            return;
        };
        display.unselect_all();
        display.select_object(next, true);
        display.center_map(None);
    }
}

impl TacticalGame for Skirmish {
    fn start(&mut self, display: &mut Display) {
        self.load_map(display);
        self.spawn_forces(display);
        let player = display.player();
        display.all_to_look(player, false);
        let home = display.waypoints.home().map(Cell::coord);
        display.center_map(home);
        display.redraw.flag_all();
        let objects = display.objects.len();
        info!(objects, "skirmish_started");
    }

    fn update(&mut self, display: &mut Display, _dt_seconds: f32) {
        for event in display.drain_events() {
            self.handle_event(display, event);
        }
        for speech in display.drain_speech() {
            info!(speech = ?speech, "speech");
        }
        self.step_units(display);
    }

    fn key_pressed(&mut self, display: &mut Display, key: KeyCode) {
        let player = display.player();
        match key {
            KeyCode::KeyB => display.set_pending_placement(Arc::clone(&self.catalog.power), player),
            KeyCode::KeyW => display.set_pending_placement(Arc::clone(&self.catalog.wall), player),
            KeyCode::KeyS => display.sell_mode_control(ModeControl::Toggle),
            KeyCode::KeyR => display.repair_mode_control(ModeControl::Toggle),
            KeyCode::KeyN => display.set_targeting(SpecialWeapon::NuclearBomb),
            KeyCode::KeyH => {
                display.center_map(None);
            }
            KeyCode::Tab => self.select_next(display),
            KeyCode::KeyG => {
                display.shroud_the_map(player);
                display.all_to_look(player, false);
            }
            KeyCode::F5 => self.save_scenario(display),
            _ => {}
        }
    }

    fn shutdown(&mut self, display: &mut Display) {
        let objects = display.objects.len();
        info!(objects, "skirmish_shutdown");
    }
}

fn display_sight(display: &Display, cell: Cell) -> i32 {
    display
        .cell_building(cell)
        .and_then(|id| display.objects.get(id))
        .map(|object| object.class_of().sight_range)
        .unwrap_or(1)
}
