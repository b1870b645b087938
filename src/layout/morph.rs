use super::PositionMap;

/// Linear interpolation between two position maps keyed by node identity.
/// Nodes present in only one map stay at that map's position.
#[derive(Debug, Clone, Default)]
pub struct Morph {
    start: PositionMap,
    end: PositionMap,
}

impl Morph {
    /// Morph from `start` to `end`.
    #[must_use]
    pub fn new(start: PositionMap, end: PositionMap) -> Self {
        Self { start, end }
    }

    /// Start positions.
    #[must_use]
    pub fn start(&self) -> &PositionMap {
        &self.start
    }

    /// End positions.
    #[must_use]
    pub fn end(&self) -> &PositionMap {
        &self.end
    }

    /// Whether any node actually moves.
    #[must_use]
    pub fn is_still(&self) -> bool {
        self.start
            .iter()
            .all(|(key, from)| self.end.get(key).map_or(true, |to| to == from))
    }

    /// Positions at progress `t` (clamped to `[0, 1]`).
    #[must_use]
    pub fn at(&self, t: f32) -> PositionMap {
        let t = t.clamp(0.0, 1.0);
        let mut out = self.end.clone();
        for (key, from) in &self.start {
            let position = match self.end.get(key) {
                Some(to) => from.lerp(*to, t),
                None => *from,
            };
            let _ = out.insert(*key, position);
        }
        out
    }
}
