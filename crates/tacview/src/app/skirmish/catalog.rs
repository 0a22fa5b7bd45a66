#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct SkirmishSetup {
    types: Vec<ObjectType>,
    #[serde(default)]
    forces: Vec<ForceSpawn>,
    #[serde(default)]
    walls: Vec<WallRun>,
    home: HomeCell,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
struct ForceSpawn {
    kind: u32,
    house: u8,
    x: i32,
    y: i32,
    #[serde(default)]
    group: Option<u8>,
}

/// Horizontal run of wall cells starting at `x`, `y`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
struct WallRun {
    house: u8,
    x: i32,
    y: i32,
    length: i32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
struct HomeCell {
    x: i32,
    y: i32,
}

fn parse_setup(raw: &str) -> Result<SkirmishSetup, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, SkirmishSetup>(&mut deserializer) {
        Ok(setup) => Ok(setup),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse skirmish setup: {source}"))
            } else {
                Err(format!("parse skirmish setup at {path}: {source}"))
            }
        }
    }
}

/// Shared type records, one per key.
#[derive(Debug)]
struct Catalog {
    types: BTreeMap<TypeKey, TypeRef>,
    /// Building offered by the build hotkey.
    power: TypeRef,
    wall: TypeRef,
}

impl Catalog {
    fn new(types: &[ObjectType]) -> Result<Self, String> {
        let mut by_key = BTreeMap::new();
        for (index, kind) in types.iter().enumerate() {
            if by_key.insert(kind.key, Arc::new(kind.clone())).is_some() {
                return Err(format!(
                    "validation failed at types[{index}].key: duplicate key {}",
                    kind.key.0
                ));
            }
        }

        let power = by_key
            .values()
            .find(|kind| kind.is_building() && kind.is_base && kind.name == "powr")
            .cloned()
            .ok_or_else(|| "validation failed at types: no 'powr' base building".to_string())?;
        let wall = by_key
            .values()
            .find(|kind| kind.is_wall)
            .cloned()
            .ok_or_else(|| "validation failed at types: no wall type".to_string())?;

        Ok(Self {
            types: by_key,
            power,
            wall,
        })
    }

    fn get(&self, key: TypeKey) -> Option<TypeRef> {
        self.types.get(&key).cloned()
    }
}
