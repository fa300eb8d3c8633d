//! Units and the Unit Registry

use glam::Vec3;

use tactics_events::{ActionKind, GridCell, Side, UnitId};

use super::health::Health;
use super::ledger::Ledger;
use crate::actions::ActionSpec;

/// A combatant on the grid.
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub side: Side,
    /// Cell the grid store currently files this unit under.
    pub cell: GridCell,
    /// Continuous world position; drifts between cells while moving.
    pub position: Vec3,
    /// Unit-length horizontal facing.
    pub facing: Vec3,
    pub health: Health,
    pub ledger: Ledger,
    pub actions: Vec<ActionSpec>,
}

impl Unit {
    pub fn action(&self, kind: ActionKind) -> Option<&ActionSpec> {
        self.actions.iter().find(|spec| spec.kind() == kind)
    }

    pub fn has_action(&self, kind: ActionKind) -> bool {
        self.action(kind).is_some()
    }

    pub fn is_hostile_to(&self, other: &Unit) -> bool {
        self.side.is_hostile_to(other.side)
    }

    /// Turns to look at `point`, ignoring height difference.
    pub fn face_towards(&mut self, point: Vec3) {
        let flat = Vec3::new(point.x - self.position.x, 0.0, point.z - self.position.z);
        if let Some(direction) = flat.try_normalize() {
            self.facing = direction;
        }
    }
}

/// All living units, in spawn order.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: Vec<Unit>,
    next_id: u32,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the next unit id.
    pub fn allocate_id(&mut self) -> UnitId {
        self.next_id += 1;
        UnitId(self.next_id)
    }

    pub fn insert(&mut self, unit: Unit) {
        self.next_id = self.next_id.max(unit.id.0);
        self.units.push(unit);
    }

    pub fn remove(&mut self, id: UnitId) -> Option<Unit> {
        let index = self.units.iter().position(|u| u.id == id)?;
        Some(self.units.remove(index))
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.iter_mut()
    }

    /// Ids of one side's units, in spawn order.
    pub fn ids_of(&self, side: Side) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|u| u.side == side)
            .map(|u| u.id)
            .collect()
    }

    pub fn count_of(&self, side: Side) -> usize {
        self.units.iter().filter(|u| u.side == side).count()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(registry: &mut UnitRegistry, side: Side) -> Unit {
        Unit {
            id: registry.allocate_id(),
            name: "Test".into(),
            side,
            cell: GridCell::new(0, 0, 0),
            position: Vec3::ZERO,
            facing: Vec3::Z,
            health: Health::new(100),
            ledger: Ledger::new(2, 4),
            actions: Vec::new(),
        }
    }

    #[test]
    fn test_registry_keeps_spawn_order() {
        let mut registry = UnitRegistry::new();
        let a = unit(&mut registry, Side::Opponent);
        let b = unit(&mut registry, Side::Player);
        let c = unit(&mut registry, Side::Opponent);
        let (a_id, c_id) = (a.id, c.id);
        registry.insert(a);
        registry.insert(b);
        registry.insert(c);

        assert_eq!(registry.ids_of(Side::Opponent), vec![a_id, c_id]);
        assert_eq!(registry.count_of(Side::Player), 1);
    }

    #[test]
    fn test_remove_unit() {
        let mut registry = UnitRegistry::new();
        let a = unit(&mut registry, Side::Player);
        let id = a.id;
        registry.insert(a);
        assert!(registry.remove(id).is_some());
        assert!(registry.remove(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_face_towards_ignores_height() {
        let mut registry = UnitRegistry::new();
        let mut a = unit(&mut registry, Side::Player);
        a.face_towards(Vec3::new(3.0, 10.0, 0.0));
        assert!((a.facing - Vec3::X).length() < 1e-6);

        // Looking straight up keeps the old facing
        a.face_towards(Vec3::new(0.0, 5.0, 0.0));
        assert!((a.facing - Vec3::X).length() < 1e-6);
    }
}
