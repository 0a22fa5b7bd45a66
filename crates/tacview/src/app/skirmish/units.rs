/// Mutable state of one skirmish object. The display owns the object, the
/// skirmish keeps a second handle so it can drive movement between frames.
#[derive(Debug)]
struct Body {
    coord: Coordinate,
    destination: Option<Coordinate>,
    attack_target: Option<Target>,
    /// Weapon reach in leptons; zero for unarmed objects.
    range: i32,
    /// Leptons per tick.
    speed: i32,
    sight: i32,
    owner: HouseId,
    group: u8,
    selected: bool,
}

#[derive(Debug)]
struct DemoObject {
    kind: TypeRef,
    owner: HouseId,
    body: Rc<RefCell<Body>>,
}

impl DemoObject {
    fn is_armed(&self) -> bool {
        self.kind.rtti.is_foot() && !self.kind.economy_unit
    }
}

impl TacticalObject for DemoObject {
    fn class_of(&self) -> &ObjectType {
        &self.kind
    }

    fn owner(&self) -> HouseId {
        self.owner
    }

    fn coord(&self) -> Coordinate {
        self.body.borrow().coord
    }

    fn center_coord(&self) -> Coordinate {
        let coord = self.coord();
        if !self.kind.is_building() {
            return coord;
        }
        let (w, h) = self.kind.footprint.dimensions();
        coord.add(Coordinate::from_xy(w * CELL_LEPTON_W / 2, h * CELL_LEPTON_W / 2))
    }

    fn height(&self) -> i32 {
        if self.kind.rtti == Rtti::Aircraft {
            AIRCRAFT_ALTITUDE
        } else {
            0
        }
    }

    fn can_repair(&self) -> bool {
        self.kind.is_building() && !self.kind.is_wall
    }

    fn in_range_of(&self, target: &TargetInfo) -> bool {
        let body = self.body.borrow();
        body.range > 0 && distance(body.coord, target.coord) <= body.range
    }

    fn group(&self) -> u8 {
        self.body.borrow().group
    }

    fn what_action(&self, target: &TargetInfo) -> Action {
        match (target.target, target.owner) {
            (Target::Object(_), Some(owner)) if owner == self.owner => Action::Select,
            (Target::Object(_), _) if self.is_armed() => Action::Attack,
            (Target::Object(_), _) => Action::Select,
            (Target::Cell(_), _) if self.kind.rtti.is_foot() => Action::Move,
            (Target::Cell(_), _) => Action::None,
        }
    }

    fn select(&mut self, _allow_voice: bool) -> bool {
        if !self.kind.selectable {
            return false;
        }
        self.body.borrow_mut().selected = true;
        true
    }

    fn unselect(&mut self) {
        self.body.borrow_mut().selected = false;
    }

    fn active_click_with(&mut self, action: Action, target: Target, context: &ClickContext) {
        let mut body = self.body.borrow_mut();
        let top_speed = match context.formation {
            Some(formation) if formation.group == body.group => {
                formation.max_speed.min(self.kind.max_speed)
            }
            _ => self.kind.max_speed,
        };
        body.speed = top_speed * LEPTONS_PER_SPEED_POINT;
        match (action, target) {
            (Action::Move, Target::Cell(cell)) => {
                body.attack_target = None;
                body.destination = Some(self.adjust_dest(cell).coord());
            }
            (Action::Attack, target) => {
                body.attack_target = Some(target);
            }
            _ => debug!(action = ?action, kind = %self.kind.name, "order_ignored"),
        }
    }

    fn render(&mut self, canvas: &mut Canvas<'_>, x: i32, y: i32, _forced: bool) {
        let color = house_color(self.owner.0);
        let selected = self.body.borrow().selected;
        if self.kind.is_building() {
            let (w, h) = self.kind.footprint.dimensions();
            let (pw, ph) = (w * 24, h * 24);
            canvas.fill_rect(x + 2, y + 2, pw - 4, ph - 4, color);
            if selected {
                canvas.draw_rect(x, y, x + pw - 1, y + ph - 1, WHITE);
            }
            return;
        }

        let half = match self.kind.rtti {
            Rtti::Infantry => 3,
            Rtti::Aircraft => 5,
            _ => 7,
        };
        canvas.fill_rect(x - half, y - half, half * 2, half * 2, color);
        if selected {
            canvas.draw_square_outline(x, y, half + 2, WHITE);
        }
    }
}

fn weapon_range(kind: &ObjectType) -> i32 {
    match kind.rtti {
        _ if kind.economy_unit || !kind.rtti.is_foot() => 0,
        Rtti::Infantry => CELL_LEPTON_W * 2,
        _ => CELL_LEPTON_W * 4,
    }
}

/// Adds an object of `kind` standing in `cell` and returns its id.
fn spawn(
    display: &mut Display,
    bodies: &mut BTreeMap<ObjectId, Rc<RefCell<Body>>>,
    kind: TypeRef,
    owner: HouseId,
    cell: Cell,
    group: u8,
) -> ObjectId {
    let coord = if kind.is_building() {
        cell.whole_coord()
    } else {
        cell.coord()
    };
    let layer = if kind.rtti == Rtti::Aircraft {
        LayerKind::Air
    } else {
        LayerKind::Ground
    };
    let body = Rc::new(RefCell::new(Body {
        coord,
        destination: None,
        attack_target: None,
        range: weapon_range(&kind),
        speed: kind.max_speed * LEPTONS_PER_SPEED_POINT,
        sight: kind.sight_range,
        owner,
        group,
        selected: false,
    }));
    let object = DemoObject {
        kind,
        owner,
        body: Rc::clone(&body),
    };
    let id = display.add_object(Box::new(object), layer);
    bodies.insert(id, body);
    id
}

/// One tick of straight-line travel; lands exactly on `dest` when in reach.
fn step_toward(from: Coordinate, dest: Coordinate, speed: i32) -> Coordinate {
    let dx = i64::from(dest.x() - from.x());
    let dy = i64::from(dest.y() - from.y());
    let length = ((dx * dx + dy * dy) as f64).sqrt();
    if speed <= 0 {
        return from;
    }
    if length <= f64::from(speed) {
        return dest;
    }
    let scale = f64::from(speed) / length;
    Coordinate::from_xy(
        from.x() + (dx as f64 * scale).round() as i32,
        from.y() + (dy as f64 * scale).round() as i32,
    )
}
