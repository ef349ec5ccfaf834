use std::cell::RefCell;
use std::collections::HashMap;

/// Maps numeric owner ids to names.
///
/// `None` means the lookup failed; renderers emit an empty field for it.
pub trait Resolver {
    fn user_name(&self, uid: u32) -> Option<String>;
    fn group_name(&self, gid: u32) -> Option<String>;
}

/// Looks ids up in the system user and group databases.
///
/// Each id is resolved at most once per run; walks tend to see the same few
/// owners over and over.
#[derive(Default)]
pub struct SystemResolver {
    users:  RefCell<HashMap<u32, Option<String>>>,
    groups: RefCell<HashMap<u32, Option<String>>>,
}

impl SystemResolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Resolver for SystemResolver {
    fn user_name(&self, uid: u32) -> Option<String> {
        self.users
            .borrow_mut()
            .entry(uid)
            .or_insert_with(|| lookup_user(uid))
            .clone()
    }

    fn group_name(&self, gid: u32) -> Option<String> {
        self.groups
            .borrow_mut()
            .entry(gid)
            .or_insert_with(|| lookup_group(gid))
            .clone()
    }
}

#[cfg(unix)]
fn lookup_user(uid: u32) -> Option<String> {
    use nix::unistd::{Uid, User};

    match User::from_uid(Uid::from_raw(uid)) {
        Ok(Some(user)) => Some(user.name),
        Ok(None) => {
            log::debug!("no user with uid {uid}");
            None
        }
        Err(e) => {
            log::debug!("user lookup for uid {uid} failed: {e}");
            None
        }
    }
}

#[cfg(unix)]
fn lookup_group(gid: u32) -> Option<String> {
    use nix::unistd::{Gid, Group};

    match Group::from_gid(Gid::from_raw(gid)) {
        Ok(Some(group)) => Some(group.name),
        Ok(None) => {
            log::debug!("no group with gid {gid}");
            None
        }
        Err(e) => {
            log::debug!("group lookup for gid {gid} failed: {e}");
            None
        }
    }
}

#[cfg(not(unix))]
fn lookup_user(_uid: u32) -> Option<String> {
    None
}

#[cfg(not(unix))]
fn lookup_group(_gid: u32) -> Option<String> {
    None
}
