//! Barrier pairs: spawning, scrolling and recycling.

use rand::Rng;

use crate::config::GameConfig;
use crate::geometry::Rect;

#[derive(Debug, Clone, PartialEq)]
pub struct Barrier {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Set once the player has passed this barrier.
    pub scored: bool,
}

impl Barrier {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            scored: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.rect().right()
    }
}

/// Draws the bottom barrier's center height: a multiple of `offset_step` in
/// `[offset_min, offset_max)`, every value equally likely.
pub fn random_offset<R: Rng>(rng: &mut R, config: &GameConfig) -> i32 {
    let slots = (config.offset_max - config.offset_min) / config.offset_step;
    config.offset_min + rng.gen_range(0..slots) * config.offset_step
}

/// Barriers in spawn order. All share one speed, so this is also left-to-right order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarrierSet {
    barriers: Vec<Barrier>,
}

impl BarrierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a bottom and a top barrier just beyond `right_edge_x`, sharing one random
    /// offset. Returns the offset used.
    pub fn spawn_pair<R: Rng>(
        &mut self,
        rng: &mut R,
        right_edge_x: f64,
        config: &GameConfig,
    ) -> i32 {
        let offset = random_offset(rng, config);
        self.push_pair(offset, right_edge_x, config);
        offset
    }

    pub(crate) fn push_pair(&mut self, offset: i32, right_edge_x: f64, config: &GameConfig) {
        let x = right_edge_x + config.barrier_width;
        let bottom_y = offset as f64;
        let top_y = bottom_y + config.barrier_gap + config.barrier_height;

        self.barriers
            .push(Barrier::new(x, bottom_y, config.barrier_width, config.barrier_height));
        self.barriers
            .push(Barrier::new(x, top_y, config.barrier_width, config.barrier_height));
    }

    /// True when the set is empty or the newest barrier has scrolled past
    /// `screen_width - barrier_interval`.
    pub fn needs_spawn(&self, config: &GameConfig) -> bool {
        match self.barriers.last() {
            None => true,
            Some(last) => last.x < config.screen_width - config.barrier_interval,
        }
    }

    /// Scrolls every barrier left by `speed` and drops the ones fully off the left edge.
    pub fn advance_all(&mut self, speed: f64) {
        for barrier in &mut self.barriers {
            barrier.x -= speed;
        }
        self.barriers.retain(|b| b.right() >= 0.0);
    }

    pub fn clear(&mut self) {
        self.barriers.clear();
    }

    pub fn len(&self) -> usize {
        self.barriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.barriers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Barrier> {
        self.barriers.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Barrier> {
        self.barriers.iter_mut()
    }

    pub fn as_slice(&self) -> &[Barrier] {
        &self.barriers
    }

    pub fn push(&mut self, barrier: Barrier) {
        self.barriers.push(barrier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    #[test]
    fn test_spawn_pair_geometry() {
        let config = GameConfig::default();
        let mut rng = create_test_rng();
        let mut set = BarrierSet::new();

        for _ in 0..50 {
            set.clear();
            let offset = set.spawn_pair(&mut rng, config.screen_width, &config);
            assert_eq!(set.len(), 2);
            let bottom = &set.as_slice()[0];
            let top = &set.as_slice()[1];
            assert_eq!(bottom.y, offset as f64);
            assert_eq!(top.y, bottom.y + config.barrier_gap + config.barrier_height);
            assert_eq!(bottom.x, config.screen_width + config.barrier_width);
            assert_eq!(top.x, bottom.x);
            assert!(!bottom.scored && !top.scored);
        }
    }

    #[test]
    fn test_gap_between_pair_edges() {
        let config = GameConfig::default();
        let mut set = BarrierSet::new();
        set.push_pair(-120, 600.0, &config);
        let bottom = set.as_slice()[0].rect();
        let top = set.as_slice()[1].rect();
        assert_eq!(top.bottom() - bottom.top(), config.barrier_gap);
    }

    #[test]
    fn test_offset_values_in_discrete_range() {
        let config = GameConfig::default();
        let mut rng = create_test_rng();
        for _ in 0..2000 {
            let offset = random_offset(&mut rng, &config);
            assert!((-200..200).contains(&offset));
            assert_eq!(offset % 10, 0);
        }
    }

    #[test]
    fn test_offset_distribution_roughly_uniform() {
        let config = GameConfig::default();
        let mut rng = create_test_rng();
        let mut counts = [0u32; 40];
        let draws = 40_000;
        for _ in 0..draws {
            let offset = random_offset(&mut rng, &config);
            counts[((offset + 200) / 10) as usize] += 1;
        }
        // Expected 1000 per value; the binomial std-dev is ~31.
        for (slot, &count) in counts.iter().enumerate() {
            assert!(
                (800..=1200).contains(&count),
                "offset {} drawn {count} times",
                slot as i32 * 10 - 200
            );
        }
    }

    #[test]
    fn test_needs_spawn() {
        let config = GameConfig::default();
        let mut set = BarrierSet::new();
        assert!(set.needs_spawn(&config));

        set.push_pair(0, config.screen_width, &config);
        assert!(!set.needs_spawn(&config));

        let threshold = config.screen_width - config.barrier_interval;
        for b in set.iter_mut() {
            b.x = threshold;
        }
        assert!(!set.needs_spawn(&config));
        for b in set.iter_mut() {
            b.x = threshold - 0.1;
        }
        assert!(set.needs_spawn(&config));
    }

    #[test]
    fn test_advance_all_moves_uniformly() {
        let config = GameConfig::default();
        let mut set = BarrierSet::new();
        set.push_pair(0, 300.0, &config);
        set.push_pair(50, 600.0, &config);
        set.advance_all(3.5);
        let xs: Vec<f64> = set.iter().map(|b| b.x).collect();
        assert_eq!(xs, vec![376.5, 376.5, 676.5, 676.5]);
    }

    #[test]
    fn test_advance_all_removes_only_fully_offscreen() {
        let mut set = BarrierSet::new();
        // right edge = x + 5
        set.push(Barrier::new(-4.0, 0.0, 10.0, 10.0)); // right edge 1.0
        set.push(Barrier::new(-5.0, 0.0, 10.0, 10.0)); // right edge 0.0
        set.push(Barrier::new(-5.5, 0.0, 10.0, 10.0)); // right edge -0.5
        set.push(Barrier::new(40.0, 0.0, 10.0, 10.0));

        set.advance_all(0.0);
        let xs: Vec<f64> = set.iter().map(|b| b.x).collect();
        assert_eq!(xs, vec![-4.0, -5.0, 40.0]);

        set.advance_all(1.0);
        let xs: Vec<f64> = set.iter().map(|b| b.x).collect();
        assert_eq!(xs, vec![-5.0, 39.0]);
        assert!(set.iter().all(|b| b.right() >= 0.0));
    }
}
