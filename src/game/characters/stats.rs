// Character props shared by the body and the movement code

/// Physical properties of the controlled character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterProps {
    /// Radius of the smallest capsule sphere; the others scale from it
    pub radius: f32,
    /// Ground speed in units/second (halved while backpedaling)
    pub velocity: f32,
}

pub const BASE_PROPS: CharacterProps = CharacterProps {
    radius: 0.3,
    velocity: 4.0,
};

impl Default for CharacterProps {
    fn default() -> Self {
        BASE_PROPS
    }
}

impl CharacterProps {
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = velocity;
        self
    }

    /// Speed for the current keys
    pub fn speed(&self, backpedaling: bool) -> f32 {
        if backpedaling {
            self.velocity * 0.5
        } else {
            self.velocity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_props() {
        let props = CharacterProps::default();
        assert_eq!(props.radius, 0.3);
        assert_eq!(props.velocity, 4.0);
    }

    #[test]
    fn test_backpedal_halves_speed() {
        let props = CharacterProps::default().with_velocity(6.0);
        assert_eq!(props.speed(false), 6.0);
        assert_eq!(props.speed(true), 3.0);
    }
}
