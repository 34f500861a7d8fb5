use crate::entity::{animate, SpatialEntity};
use crate::spawn::{random_between, SpawnLane, SpawnScheduler};
use rand::Rng;
use sky_voyager_shared::config::WorldConfig;
use sky_voyager_shared::protocol::EntityCategory;

/// Per-category ordered collections of active world objects.
#[derive(Debug, Default)]
pub struct WorldObjectRegistry {
    stars: Vec<SpatialEntity>,
    obstacles: Vec<SpatialEntity>,
    rings: Vec<SpatialEntity>,
    clouds: Vec<SpatialEntity>,
    next_id: u32,
}

impl WorldObjectRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Reserve a fresh entity id.
    pub fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn bucket(&self, category: EntityCategory) -> &[SpatialEntity] {
        match category {
            EntityCategory::Star => &self.stars,
            EntityCategory::Obstacle => &self.obstacles,
            EntityCategory::Ring => &self.rings,
            EntityCategory::Cloud => &self.clouds,
            EntityCategory::Aircraft => &[],
        }
    }

    /// `None` for the aircraft, which the registry does not hold.
    fn bucket_mut(&mut self, category: EntityCategory) -> Option<&mut Vec<SpatialEntity>> {
        match category {
            EntityCategory::Star => Some(&mut self.stars),
            EntityCategory::Obstacle => Some(&mut self.obstacles),
            EntityCategory::Ring => Some(&mut self.rings),
            EntityCategory::Cloud => Some(&mut self.clouds),
            EntityCategory::Aircraft => None,
        }
    }

    /// Add an entity to the end of its category's sequence.
    pub fn insert(&mut self, entity: SpatialEntity) {
        match self.bucket_mut(entity.category()) {
            Some(bucket) => bucket.push(entity),
            None => tracing::warn!("Ignoring aircraft insert into world registry"),
        }
    }

    /// Remove the entity with `id`. Returns it, or `None` if it was already gone.
    pub fn remove(&mut self, category: EntityCategory, id: u32) -> Option<SpatialEntity> {
        let bucket = self.bucket_mut(category)?;
        let idx = bucket.iter().position(|e| e.id == id)?;
        Some(bucket.remove(idx))
    }

    pub fn count(&self, category: EntityCategory) -> usize {
        self.bucket(category).len()
    }

    pub fn iter(
        &self,
        category: EntityCategory,
    ) -> impl DoubleEndedIterator<Item = &SpatialEntity> {
        self.bucket(category).iter()
    }

    pub fn iter_mut(
        &mut self,
        category: EntityCategory,
    ) -> impl Iterator<Item = &mut SpatialEntity> {
        self.bucket_mut(category).into_iter().flat_map(|b| b.iter_mut())
    }

    /// Every entity in draw order: clouds, stars, obstacles, rings.
    pub fn iter_all(&self) -> impl Iterator<Item = &SpatialEntity> {
        self.clouds
            .iter()
            .chain(self.stars.iter())
            .chain(self.obstacles.iter())
            .chain(self.rings.iter())
    }

    /// Move every entity of `category` toward the camera and step its animation.
    /// Collected stars move but do not animate.
    pub fn advance(&mut self, category: EntityCategory, speed: f64, delta: f64) {
        let dz = speed * delta;
        for entity in self.iter_mut(category) {
            entity.pos.z += dz;
            animate(entity, delta);
        }
    }

    /// Drop every entity of `category` whose z is past `threshold`, preserving
    /// the order of the rest. Clouds are recycled to the spawn distance with a
    /// fresh x/y instead. Returns how many entities were removed or recycled.
    pub fn despawn_pass(
        &mut self,
        category: EntityCategory,
        threshold: f64,
        config: &WorldConfig,
        rng: &mut impl Rng,
    ) -> usize {
        if category == EntityCategory::Cloud {
            let lane = SpawnLane::for_category(EntityCategory::Cloud, config);
            let mut wrapped = 0;
            for cloud in self.clouds.iter_mut().filter(|c| c.pos.z > threshold) {
                let (x, y) = lane.sample(rng);
                cloud.pos.x = x;
                cloud.pos.y = y;
                cloud.pos.z = config.spawn_distance;
                wrapped += 1;
            }
            return wrapped;
        }

        let Some(bucket) = self.bucket_mut(category) else {
            return 0;
        };
        let before = bucket.len();
        bucket.retain(|e| e.pos.z <= threshold);
        let removed = before - bucket.len();
        if removed > 0 {
            tracing::debug!("Despawned {} {:?}", removed, category);
        }
        removed
    }

    /// Remove all stars, obstacles and rings. Clouds stay.
    pub fn clear_hazards(&mut self) {
        self.stars.clear();
        self.obstacles.clear();
        self.rings.clear();
    }

    /// Scatter `count` clouds over the whole visible depth.
    pub fn populate_clouds(
        &mut self,
        count: usize,
        spawner: &SpawnScheduler,
        config: &WorldConfig,
        rng: &mut impl Rng,
    ) {
        for _ in 0..count {
            let id = self.allocate_id();
            let mut cloud = spawner.place(EntityCategory::Cloud, id, rng);
            cloud.pos.z = random_between(rng, config.spawn_distance, config.despawn_distance);
            self.clouds.push(cloud);
        }
    }

    /// Give every cloud a new random depth; x/y are kept.
    pub fn rewind_clouds(&mut self, config: &WorldConfig, rng: &mut impl Rng) {
        for cloud in &mut self.clouds {
            cloud.pos.z = random_between(rng, config.spawn_distance, config.despawn_distance);
        }
    }
}
