//! Player record persistence.
//!
//! Two interchangeable backends sit behind [`PlayerStore`]: a sled tree holding
//! bincode records under `players:<id>`, and a single `players.json` file guarded
//! with fs2 advisory locks. Records are keyed by the chat platform's user id.

use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sled::IVec;

use crate::game::errors::GameError;
use crate::game::types::{Player, PLAYER_SCHEMA_VERSION};

const TREE_PLAYERS: &str = "players";
const PLAYER_PREFIX: &str = "players:";
const JSON_FILE: &str = "players.json";

/// Keyed persistence of player records.
pub trait PlayerStore: Send {
    fn get_player(&self, id: &str) -> Result<Player, GameError>;

    /// Insert a brand new record; refuses to overwrite an existing one.
    fn create_player(&self, player: Player) -> Result<(), GameError> {
        match self.get_player(&player.id) {
            Ok(_) => Err(GameError::AlreadyExists),
            Err(GameError::NotFound(_)) => self.put_player(player),
            Err(e) => Err(e),
        }
    }

    /// Insert or replace a record.
    fn put_player(&self, player: Player) -> Result<(), GameError>;

    fn list_player_ids(&self) -> Result<Vec<String>, GameError>;

    fn load_all(&self) -> Result<BTreeMap<String, Player>, GameError>;

    /// Replace the whole store with `players`.
    fn save_all(&self, players: &BTreeMap<String, Player>) -> Result<(), GameError>;

    fn exists(&self, id: &str) -> Result<bool, GameError> {
        match self.get_player(id) {
            Ok(_) => Ok(true),
            Err(GameError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

fn check_schema(record: &Player) -> Result<(), GameError> {
    if record.schema_version != PLAYER_SCHEMA_VERSION {
        return Err(GameError::SchemaMismatch {
            entity: "player",
            expected: PLAYER_SCHEMA_VERSION,
            found: record.schema_version,
        });
    }
    Ok(())
}

/// Builder so tests can open throwaway stores at custom paths.
pub struct SledPlayerStoreBuilder {
    path: PathBuf,
    flush_on_write: bool,
}

impl SledPlayerStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            flush_on_write: true,
        }
    }

    /// Skip the per-write flush (bulk imports, tests).
    pub fn without_flush(mut self) -> Self {
        self.flush_on_write = false;
        self
    }

    pub fn open(self) -> Result<SledPlayerStore, GameError> {
        SledPlayerStore::open_with_options(self.path, self.flush_on_write)
    }
}

/// Sled-backed player store.
pub struct SledPlayerStore {
    _db: sled::Db,
    players: sled::Tree,
    flush_on_write: bool,
}

impl SledPlayerStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        Self::open_with_options(path, true)
    }

    fn open_with_options<P: AsRef<Path>>(path: P, flush_on_write: bool) -> Result<Self, GameError> {
        let path_ref = path.as_ref();
        fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let players = db.open_tree(TREE_PLAYERS)?;
        Ok(Self {
            _db: db,
            players,
            flush_on_write,
        })
    }

    fn player_key(id: &str) -> Vec<u8> {
        format!("{}{}", PLAYER_PREFIX, id).into_bytes()
    }

    fn decode(bytes: IVec) -> Result<Player, GameError> {
        let record: Player = bincode::deserialize(&bytes)?;
        check_schema(&record)?;
        Ok(record)
    }

    fn flush(&self) -> Result<(), GameError> {
        if self.flush_on_write {
            self.players.flush()?;
        }
        Ok(())
    }
}

impl PlayerStore for SledPlayerStore {
    fn get_player(&self, id: &str) -> Result<Player, GameError> {
        let Some(bytes) = self.players.get(Self::player_key(id))? else {
            return Err(GameError::NotFound(format!("player: {}", id)));
        };
        Self::decode(bytes)
    }

    fn create_player(&self, mut player: Player) -> Result<(), GameError> {
        player.schema_version = PLAYER_SCHEMA_VERSION;
        let bytes = bincode::serialize(&player)?;
        // compare_and_swap against "absent" makes the existence check atomic
        let inserted = self
            .players
            .compare_and_swap(Self::player_key(&player.id), None as Option<&[u8]>, Some(bytes))?;
        if inserted.is_err() {
            return Err(GameError::AlreadyExists);
        }
        self.flush()
    }

    fn put_player(&self, mut player: Player) -> Result<(), GameError> {
        player.schema_version = PLAYER_SCHEMA_VERSION;
        player.touch();
        let bytes = bincode::serialize(&player)?;
        self.players.insert(Self::player_key(&player.id), bytes)?;
        self.flush()
    }

    fn list_player_ids(&self) -> Result<Vec<String>, GameError> {
        let mut ids = Vec::new();
        for entry in self.players.scan_prefix(PLAYER_PREFIX.as_bytes()) {
            let (key, _) = entry?;
            let text = String::from_utf8_lossy(&key);
            if let Some(id) = text.strip_prefix(PLAYER_PREFIX) {
                ids.push(id.to_string());
            }
        }
        Ok(ids)
    }

    fn load_all(&self) -> Result<BTreeMap<String, Player>, GameError> {
        let mut all = BTreeMap::new();
        for entry in self.players.scan_prefix(PLAYER_PREFIX.as_bytes()) {
            let (_, bytes) = entry?;
            let record = Self::decode(bytes)?;
            all.insert(record.id.clone(), record);
        }
        Ok(all)
    }

    fn save_all(&self, players: &BTreeMap<String, Player>) -> Result<(), GameError> {
        let mut batch = sled::Batch::default();
        for key in self.players.scan_prefix(PLAYER_PREFIX.as_bytes()).keys() {
            batch.remove(key?);
        }
        for (id, player) in players {
            let mut record = player.clone();
            record.id = id.clone();
            record.schema_version = PLAYER_SCHEMA_VERSION;
            batch.insert(Self::player_key(id), bincode::serialize(&record)?);
        }
        self.players.apply_batch(batch)?;
        self.flush()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PlayersFile {
    #[serde(default)]
    players: BTreeMap<String, Player>,
}

/// JSON file store at `<data_dir>/players.json`.
///
/// Reads take a shared lock. Every write re-reads the file under an exclusive lock
/// and merges only the record it changes, so concurrent writers touching different
/// players do not clobber each other.
pub struct JsonPlayerStore {
    path: PathBuf,
}

impl JsonPlayerStore {
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, GameError> {
        let dir = data_dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(JSON_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(contents: &str) -> Result<PlayersFile, GameError> {
        let cleaned = contents.trim_start_matches('\0').trim();
        if cleaned.is_empty() {
            return Ok(PlayersFile::default());
        }
        let file: PlayersFile = serde_json::from_str(cleaned)?;
        for record in file.players.values() {
            check_schema(record)?;
        }
        Ok(file)
    }

    fn read_file(&self) -> Result<PlayersFile, GameError> {
        let mut f = match fs::OpenOptions::new().read(true).open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PlayersFile::default())
            }
            Err(e) => return Err(e.into()),
        };
        f.lock_shared()?;
        let mut s = String::new();
        let read = f.read_to_string(&mut s);
        let _ = f.unlock();
        read?;
        Self::parse(&s)
    }

    /// Exclusive read-modify-write of the whole file.
    fn modify<T>(
        &self,
        apply: impl FnOnce(&mut PlayersFile) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let mut f = fs::OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.path)?;
        f.lock_exclusive()?;
        let result = Self::modify_locked(&mut f, apply);
        if let Err(e) = f.unlock() {
            warn!("players.json: unlock failed: {}", e);
        }
        result
    }

    fn modify_locked<T>(
        f: &mut fs::File,
        apply: impl FnOnce(&mut PlayersFile) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        let mut file = Self::parse(&s)?;
        let out = apply(&mut file)?;
        let data = serde_json::to_string_pretty(&file)?;
        // Rewrite from the start so a shorter document leaves no trailing bytes
        f.seek(SeekFrom::Start(0))?;
        f.set_len(0)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        f.sync_all()?;
        Ok(out)
    }
}

impl PlayerStore for JsonPlayerStore {
    fn get_player(&self, id: &str) -> Result<Player, GameError> {
        self.read_file()?
            .players
            .remove(id)
            .ok_or_else(|| GameError::NotFound(format!("player: {}", id)))
    }

    fn create_player(&self, mut player: Player) -> Result<(), GameError> {
        player.schema_version = PLAYER_SCHEMA_VERSION;
        self.modify(|file| {
            if file.players.contains_key(&player.id) {
                return Err(GameError::AlreadyExists);
            }
            file.players.insert(player.id.clone(), player);
            Ok(())
        })
    }

    fn put_player(&self, mut player: Player) -> Result<(), GameError> {
        player.schema_version = PLAYER_SCHEMA_VERSION;
        player.touch();
        debug!("players.json: writing record {}", player.id);
        self.modify(|file| {
            file.players.insert(player.id.clone(), player);
            Ok(())
        })
    }

    fn list_player_ids(&self) -> Result<Vec<String>, GameError> {
        Ok(self.read_file()?.players.into_keys().collect())
    }

    fn load_all(&self) -> Result<BTreeMap<String, Player>, GameError> {
        Ok(self.read_file()?.players)
    }

    fn save_all(&self, players: &BTreeMap<String, Player>) -> Result<(), GameError> {
        self.modify(|file| {
            file.players = players.clone();
            for record in file.players.values_mut() {
                record.schema_version = PLAYER_SCHEMA_VERSION;
            }
            Ok(())
        })
    }
}
