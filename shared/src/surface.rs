//! Textured surfaces available to level geometry

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Surface {
    EmergencyExit,
    #[default]
    Concrete,
    Gravel,
    Grass1,
    Grass2,
    Ground,
    Metal,
    PavingStones,
    Plaster,
    Rust,
    Steel,
}

impl Surface {
    pub fn all() -> &'static [Surface] {
        &[
            Surface::EmergencyExit,
            Surface::Concrete,
            Surface::Gravel,
            Surface::Grass1,
            Surface::Grass2,
            Surface::Ground,
            Surface::Metal,
            Surface::PavingStones,
            Surface::Plaster,
            Surface::Rust,
            Surface::Steel,
        ]
    }

    /// Name used in level files (matches the texture file stem)
    pub const fn name(&self) -> &'static str {
        match self {
            Surface::EmergencyExit => "EmergencyExit",
            Surface::Concrete => "Concrete",
            Surface::Gravel => "Gravel",
            Surface::Grass1 => "Grass1",
            Surface::Grass2 => "Grass2",
            Surface::Ground => "Ground",
            Surface::Metal => "Metal",
            Surface::PavingStones => "PavingStones",
            Surface::Plaster => "Plaster",
            Surface::Rust => "Rust",
            Surface::Steel => "Steel",
        }
    }

    pub fn from_name(name: &str) -> Option<Surface> {
        Self::all().iter().copied().find(|s| s.name() == name)
    }

    /// Asset path of the colour texture
    pub fn texture_path(&self) -> String {
        format!("textures/{}.jpg", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_resolve_back() {
        for surface in Surface::all() {
            assert_eq!(Surface::from_name(surface.name()), Some(*surface));
        }
        assert_eq!(Surface::from_name("Lava"), None);
    }

    #[test]
    fn test_texture_path() {
        assert_eq!(Surface::PavingStones.texture_path(), "textures/PavingStones.jpg");
    }
}
