//! A tiny particle simulation built directly on the core: an entity manager, an identifier with
//! one runtime-registered component, and one `ComponentStorage` per component id.

use std::error::Error;

use rusty_ecs::ecs::{
    ComponentStorage, IdCache, Identifier,
    component::Component,
    entity::{self, Entity},
};

#[derive(Component, Debug, Clone, Copy)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Component, Debug, Clone, Copy)]
struct Velocity {
    dx: f32,
    dy: f32,
}

/// Only known once a "script" asks for it.
#[derive(Component, Debug)]
#[component(name = "lifetime")]
struct Lifetime {
    ticks: u32,
}

type Statics = (Position, Velocity);

struct Stores {
    identifier: Identifier<Statics>,
    by_id: Vec<ComponentStorage>,
}

impl Stores {
    fn new() -> Result<Self, Box<dyn Error>> {
        let mut identifier = Identifier::<Statics>::new();
        let lifetime = identifier.register::<Lifetime>();

        // Component ids are contiguous, so storages line up with them.
        let by_id = vec![
            ComponentStorage::new(identifier.component_id::<Position>()?),
            ComponentStorage::new(identifier.component_id::<Velocity>()?),
            ComponentStorage::new(lifetime),
        ];
        Ok(Self { identifier, by_id })
    }

    fn of<C: Component>(&self) -> Result<&ComponentStorage, Box<dyn Error>> {
        let id = self.identifier.component_id::<C>()?;
        Ok(&self.by_id[id.index()])
    }

    fn of_mut<C: Component>(&mut self) -> Result<&mut ComponentStorage, Box<dyn Error>> {
        let id = self.identifier.component_id::<C>()?;
        Ok(&mut self.by_id[id.index()])
    }

    fn forget(&mut self, entity: Entity) {
        for storage in &mut self.by_id {
            storage.erase(entity);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut entities = entity::Manager::new();
    let mut stores = Stores::new()?;

    for (i, entity) in entities.create_many(5).into_iter().enumerate() {
        let i = i as f32;
        stores.of_mut::<Position>()?.insert(entity, Position { x: i, y: 0.0 });
        stores.of_mut::<Velocity>()?.insert(entity, Velocity { dx: 1.0, dy: i });
        stores.of_mut::<Lifetime>()?.insert(entity, Lifetime { ticks: 2 + i as u32 });
    }

    let cache = IdCache::<(Position, Velocity)>::sorted(&stores.identifier)?;
    println!("moving components: {:?}", cache.ids());

    for tick in 0..4 {
        // Integrate.
        let velocities: Vec<(Entity, Velocity)> = stores
            .of::<Velocity>()?
            .iter::<Velocity>()
            .map(|(entity, velocity)| (entity, *velocity))
            .collect();
        let positions = stores.of_mut::<Position>()?;
        for (entity, velocity) in velocities {
            if let Some(position) = positions.get_mut::<Position>(entity) {
                position.x += velocity.dx;
                position.y += velocity.dy;
            }
        }

        // Age and expire.
        let mut expired = Vec::new();
        for (entity, lifetime) in stores.of_mut::<Lifetime>()?.iter_mut::<Lifetime>() {
            lifetime.ticks = lifetime.ticks.saturating_sub(1);
            if lifetime.ticks == 0 {
                expired.push(entity);
            }
        }
        for entity in expired {
            stores.forget(entity);
            entities.destroy(entity);
        }

        println!("tick {tick}: {} live entities", entities.size());
        for (entity, position) in stores.of::<Position>()?.iter::<Position>() {
            println!("  {entity:?} at ({:.1}, {:.1})", position.x, position.y);
        }
    }

    // A recycled id gets a new generation, and the old handle sees nothing.
    let reborn = entities.create();
    println!(
        "created {reborn:?}: has position = {}",
        stores.of::<Position>()?.contains(reborn)
    );

    Ok(())
}
