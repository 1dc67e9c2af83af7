use rand::Rng;

/// One animal. Herbivores and carnivores share the record; which population
/// vector an agent lives in decides its kind. `cooldown` is the herbivore
/// reproduction cooldown and stays zero for carnivores.
#[derive(Clone, Copy, Debug)]
pub struct Agent {
    pub x: u32,
    pub y: u32,
    /// May dip below zero transiently within a tick; the population systems
    /// cull `energy <= 0` after the reproduction phase.
    pub energy: f64,
    pub cooldown: u32,
}

impl Agent {
    pub fn spawn(x: u32, y: u32, energy: f64) -> Self {
        Self {
            x,
            y,
            energy,
            cooldown: 0,
        }
    }

    /// Step one cell in a random direction, each axis drawing independently
    /// and uniformly from {-1, 0, 1}. Staying put is a legal outcome. The
    /// grid is toroidal, so positions wrap on both axes.
    pub fn wander<R: Rng + ?Sized>(&mut self, width: u32, height: u32, rng: &mut R) {
        let dx = rng.gen_range(-1i64..=1);
        let dy = rng.gen_range(-1i64..=1);
        self.x = wrap(self.x as i64 + dx, width);
        self.y = wrap(self.y as i64 + dy, height);
    }

    pub fn is_dead(&self) -> bool {
        self.energy <= 0.0
    }
}

/// Non-negative modulo, so stepping off either edge lands on the opposite
/// one instead of going negative.
fn wrap(value: i64, extent: u32) -> u32 {
    value.rem_euclid(extent as i64) as u32
}
