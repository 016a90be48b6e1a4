// CLASSIFICATION: COMMUNITY
// Filename: server.rs v0.5
// Author: Lukas Bower
// Date Modified: 2026-08-02

//! 9P adapter and server wrapper.
//!
//! [`SenseFs`] binds the node registry and device session to the `ninep`
//! protocol engine: the engine owns connections, fids, and wire framing,
//! and calls back here per operation. The tree is fixed — a root, one
//! `sense` directory, eight leaves — so walking and stat are pure table
//! lookups, and read/write dispatch straight into the session.
//!
//! Every leaf is exclusive-use: a second open while one is held is
//! refused until the first fid is clunked.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

use anyhow::Result as AnyResult;
use log::info;
use ninep::{
    fs::{FileMeta, IoUnit, Mode, Perm, QID_ROOT, Stat},
    server::{ClientId, ReadOutcome, Serve9p, Server},
};

use crate::bus::DevBus;
use crate::config::Config;
use crate::registry::{self, Access, NodeEntry, DIR_NAME};
use crate::session::Session;

fn locked<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// What a path names inside the fixed tree.
enum Resolved {
    Root,
    Dir,
    Node(&'static NodeEntry),
}

fn resolve(path: &str) -> Option<Resolved> {
    if path == "/" {
        return Some(Resolved::Root);
    }
    let rest = path.strip_prefix('/')?;
    if rest == DIR_NAME {
        return Some(Resolved::Dir);
    }
    let leaf = rest.strip_prefix(DIR_NAME)?.strip_prefix('/')?;
    registry::lookup(leaf).map(Resolved::Node)
}

/// `Serve9p` implementation over the device session.
pub struct SenseFs {
    session: Arc<Mutex<Session>>,
    qmap: Mutex<HashMap<u64, String>>, // qid -> path
    next_qid: AtomicU64,
    open_qids: Mutex<HashMap<u64, String>>, // open qid -> leaf name
    held: Mutex<HashSet<String>>,           // exclusive leaves currently open
}

impl SenseFs {
    /// Adapter over a shared session.
    pub fn new(session: Arc<Mutex<Session>>) -> Self {
        let mut qmap = HashMap::new();
        qmap.insert(QID_ROOT, String::from("/"));
        Self {
            session,
            qmap: Mutex::new(qmap),
            next_qid: AtomicU64::new(QID_ROOT + 1),
            open_qids: Mutex::new(HashMap::new()),
            held: Mutex::new(HashSet::new()),
        }
    }

    fn path_for(&self, qid: u64) -> String {
        locked(&self.qmap)
            .get(&qid)
            .cloned()
            .unwrap_or_else(|| "/".into())
    }

    fn alloc_qid(&self, path: &str) -> u64 {
        let qid = self.next_qid.fetch_add(1, Ordering::SeqCst);
        locked(&self.qmap).insert(qid, path.to_string());
        qid
    }

    /// Claim an exclusive leaf for `qid`; refused while another fid
    /// holds it open.
    fn mark_open(&self, qid: u64, entry: &'static NodeEntry) -> Result<(), String> {
        if entry.exclusive && !locked(&self.held).insert(entry.name.to_string()) {
            return Err("exclusive use file already open".to_string());
        }
        locked(&self.open_qids).insert(qid, entry.name.to_string());
        Ok(())
    }

    fn release(&self, qid: u64) {
        if let Some(name) = locked(&self.open_qids).remove(&qid) {
            locked(&self.held).remove(&name);
        }
    }

    fn leaf_meta(entry: &NodeEntry, qid: u64) -> FileMeta {
        FileMeta::file(entry.name, qid)
    }

    fn leaf_perms(entry: &NodeEntry) -> Perm {
        match entry.access {
            Access::Read => Perm::OWNER_READ,
            Access::Write => Perm::OWNER_WRITE,
        }
    }

    fn stat_at(&self, fm: FileMeta, perms: Perm) -> Stat {
        Stat {
            fm,
            perms,
            n_bytes: 0,
            last_accesses: std::time::SystemTime::now(),
            last_modified: std::time::SystemTime::now(),
            owner: String::new(),
            group: String::new(),
            last_modified_by: String::new(),
        }
    }
}

impl Serve9p for SenseFs {
    fn walk(
        &mut self,
        _cid: ClientId,
        parent_qid: u64,
        child: &str,
        _uname: &str,
    ) -> ninep::Result<FileMeta> {
        let base = self.path_for(parent_qid);
        let new_path = if child == ".." {
            String::from("/")
        } else if base == "/" {
            format!("/{}", child)
        } else {
            format!("{}/{}", base, child)
        };
        match resolve(&new_path) {
            Some(Resolved::Root) | Some(Resolved::Dir) => {
                let qid = self.alloc_qid(&new_path);
                Ok(FileMeta::dir(child, qid))
            }
            Some(Resolved::Node(_)) => {
                let qid = self.alloc_qid(&new_path);
                Ok(FileMeta::file(child, qid))
            }
            None => Err(format!("{}: no such file", child)),
        }
    }

    fn open(&mut self, _cid: ClientId, qid: u64, _mode: Mode, _uname: &str) -> ninep::Result<IoUnit> {
        let path = self.path_for(qid);
        match resolve(&path) {
            Some(Resolved::Root) | Some(Resolved::Dir) => Ok(8192),
            Some(Resolved::Node(entry)) => {
                self.mark_open(qid, entry)?;
                Ok(8192)
            }
            None => Err(format!("{}: no such file", path)),
        }
    }

    fn clunk(&mut self, _cid: ClientId, qid: u64) {
        self.release(qid);
        locked(&self.qmap).remove(&qid);
    }

    fn create(
        &mut self,
        _cid: ClientId,
        _parent: u64,
        _name: &str,
        _perm: Perm,
        _mode: Mode,
        _uname: &str,
    ) -> ninep::Result<(FileMeta, IoUnit)> {
        Err("create not supported in sensor namespace".to_string())
    }

    fn read(
        &mut self,
        _cid: ClientId,
        qid: u64,
        offset: usize,
        count: usize,
        _uname: &str,
    ) -> ninep::Result<ReadOutcome> {
        let path = self.path_for(qid);
        let entry = match resolve(&path) {
            Some(Resolved::Node(entry)) => entry,
            Some(_) => return Err(format!("{}: is a directory", path)),
            None => return Err(format!("{}: no such file", path)),
        };
        let out = locked(&self.session)
            .read_node(entry)
            .map_err(|e| e.to_string())?;
        let slice = out
            .into_bytes()
            .into_iter()
            .skip(offset)
            .take(count)
            .collect();
        Ok(ReadOutcome::Immediate(slice))
    }

    fn read_dir(&mut self, _cid: ClientId, qid: u64, _uname: &str) -> ninep::Result<Vec<Stat>> {
        let path = self.path_for(qid);
        match resolve(&path) {
            Some(Resolved::Root) => {
                let qid = self.alloc_qid(&format!("/{}", DIR_NAME));
                Ok(vec![self.stat_at(FileMeta::dir(DIR_NAME, qid), Perm::OWNER_READ)])
            }
            Some(Resolved::Dir) => Ok(registry::nodes()
                .iter()
                .map(|entry| {
                    let qid = self.alloc_qid(&format!("/{}/{}", DIR_NAME, entry.name));
                    self.stat_at(Self::leaf_meta(entry, qid), Self::leaf_perms(entry))
                })
                .collect()),
            Some(Resolved::Node(_)) => Err(format!("{}: not a directory", path)),
            None => Err(format!("{}: no such file", path)),
        }
    }

    fn write(
        &mut self,
        _cid: ClientId,
        qid: u64,
        offset: usize,
        data: Vec<u8>,
        _uname: &str,
    ) -> ninep::Result<usize> {
        let path = self.path_for(qid);
        let entry = match resolve(&path) {
            Some(Resolved::Node(entry)) => entry,
            Some(_) => return Err(format!("{}: is a directory", path)),
            None => return Err(format!("{}: no such file", path)),
        };
        if offset != 0 {
            return Err("frames are written whole at offset 0".to_string());
        }
        locked(&self.session)
            .write_node(entry, &data)
            .map_err(|e| e.to_string())?;
        Ok(data.len())
    }

    fn remove(&mut self, _cid: ClientId, _qid: u64, _uname: &str) -> ninep::Result<()> {
        Err("remove not supported in sensor namespace".to_string())
    }

    fn stat(&mut self, _cid: ClientId, qid: u64, _uname: &str) -> ninep::Result<Stat> {
        let path = self.path_for(qid);
        match resolve(&path) {
            Some(Resolved::Root) => Ok(self.stat_at(FileMeta::dir("/", qid), Perm::OWNER_READ)),
            Some(Resolved::Dir) => {
                Ok(self.stat_at(FileMeta::dir(DIR_NAME, qid), Perm::OWNER_READ))
            }
            Some(Resolved::Node(entry)) => {
                Ok(self.stat_at(Self::leaf_meta(entry, qid), Self::leaf_perms(entry)))
            }
            None => Err(format!("{}: no such file", path)),
        }
    }

    fn write_stat(
        &mut self,
        _cid: ClientId,
        _qid: u64,
        _stat: Stat,
        _uname: &str,
    ) -> ninep::Result<()> {
        Err("write_stat not supported in sensor namespace".to_string())
    }
}

/// Top-level server wrapper tying the lifecycle to the protocol engine.
pub struct SenseServer {
    cfg: Config,
    session: Arc<Mutex<Session>>,
    handle: Option<JoinHandle<()>>,
}

impl SenseServer {
    /// Create a server over the hardware bus named by the config.
    pub fn new(cfg: Config) -> Self {
        let bus = Arc::new(DevBus::new(cfg.dev_root.clone()));
        let session = Arc::new(Mutex::new(Session::new(bus)));
        Self {
            cfg,
            session,
            handle: None,
        }
    }

    /// Shared handle to the device session.
    pub fn session(&self) -> Arc<Mutex<Session>> {
        Arc::clone(&self.session)
    }

    /// Power up the devices, then publish the namespace over TCP.
    pub fn start(&mut self) -> AnyResult<()> {
        locked(&self.session).on_start();
        let server = Server::new(SenseFs::new(Arc::clone(&self.session)));
        info!(
            "serving /{} on port {} (verbose = {})",
            DIR_NAME, self.cfg.port, self.cfg.verbose
        );
        self.handle = Some(server.serve_tcp(self.cfg.port));
        Ok(())
    }

    /// Power up the devices, then publish the namespace on the named
    /// Unix socket.
    pub fn start_socket(&mut self) -> AnyResult<()> {
        locked(&self.session).on_start();
        let server = Server::new(SenseFs::new(Arc::clone(&self.session)));
        info!("serving /{} as service {}", DIR_NAME, self.cfg.service);
        self.handle = Some(server.serve_socket(self.cfg.service.clone()));
        Ok(())
    }

    /// Block until the engine's serve loop ends, then power down.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        locked(&self.session).on_stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MemBus;
    use crate::drivers::led2472g;

    fn fs() -> (MemBus, SenseFs) {
        let bus = MemBus::new();
        let mut session = Session::new(Arc::new(bus.clone()));
        session.on_start();
        (bus, SenseFs::new(Arc::new(Mutex::new(session))))
    }

    #[test]
    fn resolve_knows_the_fixed_tree() {
        assert!(matches!(resolve("/"), Some(Resolved::Root)));
        assert!(matches!(resolve("/sense"), Some(Resolved::Dir)));
        assert!(matches!(resolve("/sense/tempp"), Some(Resolved::Node(_))));
        assert!(resolve("/sense/nope").is_none());
        assert!(resolve("/other/tempp").is_none());
    }

    #[test]
    fn exclusive_leaf_refuses_second_open() {
        let (_bus, fs) = fs();
        let entry = registry::lookup("tempp").expect("tempp");
        let first = fs.alloc_qid("/sense/tempp");
        let second = fs.alloc_qid("/sense/tempp");
        fs.mark_open(first, entry).expect("first open");
        assert!(fs.mark_open(second, entry).is_err());
        fs.release(first);
        fs.mark_open(second, entry).expect("open after release");
    }

    #[test]
    fn read_slices_a_fresh_sample_by_offset() {
        let (_bus, fs) = fs();
        let entry = registry::lookup("tempp").expect("tempp");
        let out = locked(&fs.session).read_node(entry).expect("sample");
        assert_eq!(out, "42.5\n");
        // offset past the end of a fresh sample reads as EOF
        let bytes: Vec<u8> = out.into_bytes().into_iter().skip(5).take(128).collect();
        assert!(bytes.is_empty());
    }

    #[test]
    fn led_write_lands_via_dispatch() {
        let (bus, fs) = fs();
        let entry = registry::lookup("led").expect("led");
        let frame = vec![9u8; 192];
        locked(&fs.session)
            .write_node(entry, &frame)
            .expect("frame");
        assert_eq!(bus.blocks(led2472g::ADDR).last(), Some(&frame));
    }
}
