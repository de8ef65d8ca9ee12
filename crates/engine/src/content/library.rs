use std::collections::HashMap;

use crate::sim::{ActionClip, ClipSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleDefId(pub u32);

/// One compiled role archetype: everything a scene needs to spawn a soldier
/// of this kind.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleDef {
    pub id: RoleDefId,
    pub def_name: String,
    pub label: String,
    pub clips: ClipSet,
}

/// The full compiled def set: role archetypes indexed by name plus the
/// shared explosion clip grenades hand to their blast.
#[derive(Debug, Clone)]
pub struct RoleLibrary {
    role_defs: Vec<RoleDef>,
    role_ids_by_name: HashMap<String, RoleDefId>,
    explosion_clip: ActionClip,
}

impl RoleLibrary {
    /// Builds the name index and assigns ids by position. Whatever id the
    /// input defs carry is overwritten.
    pub fn from_parts(mut role_defs: Vec<RoleDef>, explosion_clip: ActionClip) -> Self {
        let mut role_ids_by_name = HashMap::with_capacity(role_defs.len());
        for (idx, def) in role_defs.iter_mut().enumerate() {
            let id = RoleDefId(idx as u32);
            def.id = id;
            role_ids_by_name.insert(def.def_name.clone(), id);
        }
        Self {
            role_defs,
            role_ids_by_name,
            explosion_clip,
        }
    }

    pub fn role_def_id_by_name(&self, name: &str) -> Option<RoleDefId> {
        self.role_ids_by_name.get(name).copied()
    }

    pub fn role_def(&self, id: RoleDefId) -> Option<&RoleDef> {
        self.role_defs.get(id.0 as usize)
    }

    pub fn role_defs(&self) -> &[RoleDef] {
        &self.role_defs
    }

    pub fn explosion_clip(&self) -> &ActionClip {
        &self.explosion_clip
    }
}
