use std::marker::PhantomData;

use log::debug;

use crate::ecs::{
    GlobalId,
    component::{Component, ComponentSet, Error, Id, Metadata, Spec, TypedId},
};

/// Scope of the process-wide numbering used to bridge identifiers.
enum Components {}

/// Something that can resolve component types to ids.
///
/// Implemented by [`Identifier`] and [`IdCache`](super::IdCache), so code needing ids can take
/// either.
pub trait Identify {
    /// Resolve `C` to its id.
    fn component_id<C: Component>(&self) -> Result<TypedId<C>, Error>;

    /// Check whether `C` resolves, without building an error.
    #[inline]
    fn contains_component<C: Component>(&self) -> bool {
        self.component_id::<C>().is_ok()
    }
}

/// Assigns compact ids to component types.
///
/// Members of the static set `S` are numbered by their position and resolve without consulting
/// any table. Every other component is numbered from `S::LEN` on when it is
/// [registered](Identifier::register). Ids are contiguous per identifier, so they can index
/// per-component storage directly.
///
/// # Example
///
/// ```rust
/// use rusty_ecs::ecs::component::{Component, Identifier};
///
/// #[derive(Component)]
/// struct Position;
///
/// #[derive(Component)]
/// struct Health;
///
/// let mut identifier = Identifier::<(Position,)>::new();
/// assert_eq!(identifier.component_id::<Position>().unwrap().index(), 0);
///
/// let health = identifier.register::<Health>();
/// assert_eq!(health.index(), 1);
/// assert!(identifier.contains_component::<Health>());
/// ```
#[derive(Debug)]
pub struct Identifier<S: ComponentSet = ()> {
    /// Global id to local id. `None` marks global ids not registered here.
    locals: Vec<Option<Id>>,

    /// Metadata for each local id, static members first.
    metadata: Vec<Metadata>,

    _set: PhantomData<fn() -> S>,
}

impl<S: ComponentSet> Default for Identifier<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ComponentSet> Identifier<S> {
    /// Create an identifier knowing only the static set `S`.
    ///
    /// # Panics
    /// Panics if a component appears more than once in `S`.
    pub fn new() -> Self {
        let metadata = S::metadata();
        for (i, member) in metadata.iter().enumerate() {
            assert!(
                metadata[..i].iter().all(|m| m.type_id() != member.type_id()),
                "component '{}' appears more than once in the static component set",
                member.type_name()
            );
        }

        Self {
            locals: Vec::new(),
            metadata,
            _set: PhantomData,
        }
    }

    /// Register a component outside the static set and get its id.
    ///
    /// # Panics
    /// Panics if `C` is a static member or is already registered. Use
    /// [`try_register`](Self::try_register) to handle either case.
    #[track_caller]
    pub fn register<C: Component>(&mut self) -> TypedId<C> {
        match self.try_register::<C>() {
            Ok(id) => id,
            Err(err) => panic!("{err}"),
        }
    }

    /// Register a component outside the static set and get its id.
    ///
    /// On error nothing changes.
    pub fn try_register<C: Component>(&mut self) -> Result<TypedId<C>, Error> {
        if let Some(position) = S::position::<C>() {
            return Err(Error::Static {
                name: C::NAME,
                id: Id::from(position),
            });
        }

        let global = GlobalId::<Components>::of::<C>() as usize;
        if let Some(id) = self.local(global) {
            return Err(Error::AlreadyRegistered { name: C::NAME, id });
        }

        let id = Id::from(self.metadata.len());
        self.metadata.reserve(1);
        if global >= self.locals.len() {
            self.locals.resize(global + 1, None);
        }
        self.locals[global] = Some(id);
        self.metadata.push(Metadata::of::<C>(id));

        debug!(
            "registered component '{}' as {} (global {global})",
            C::NAME.unwrap_or_else(std::any::type_name::<C>),
            id.index()
        );
        Ok(TypedId::new(id))
    }

    /// Resolve `C` to its id.
    ///
    /// Static members always resolve. Other components resolve once registered, and otherwise
    /// fail with [`Error::Unregistered`].
    #[inline]
    pub fn component_id<C: Component>(&self) -> Result<TypedId<C>, Error> {
        if let Some(position) = S::position::<C>() {
            return Ok(TypedId::new(Id::from(position)));
        }

        GlobalId::<Components>::peek::<C>()
            .and_then(|global| self.local(global as usize))
            .map(TypedId::new)
            .ok_or(Error::Unregistered { name: C::NAME })
    }

    /// Check whether `C` resolves to an id.
    #[inline]
    pub fn contains_component<C: Component>(&self) -> bool {
        self.component_id::<C>().is_ok()
    }

    /// Check whether `C` is a member of the static set.
    #[inline]
    pub fn is_static<C: Component>() -> bool {
        S::position::<C>().is_some()
    }

    /// Get the metadata recorded for `id`.
    #[inline]
    pub fn metadata(&self, id: Id) -> Option<&Metadata> {
        self.metadata.get(id.index())
    }

    /// Iterate the metadata of every known component, in id order.
    #[inline]
    pub fn components(&self) -> impl Iterator<Item = &Metadata> {
        self.metadata.iter()
    }

    /// Resolve every member of `Set`, in declaration order.
    #[inline]
    pub fn component_ids<Set: ComponentSet>(&self) -> Result<Vec<Id>, Error> {
        Set::resolve(self)
    }

    /// Resolve every member of `Set` into a sorted [`Spec`].
    #[inline]
    pub fn ordered_component_ids<Set: ComponentSet>(&self) -> Result<Spec, Error> {
        self.component_ids::<Set>().map(Spec::new)
    }

    /// Get the number of known components, static and registered.
    #[inline]
    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    /// Check whether no components are known.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    #[inline]
    fn local(&self, global: usize) -> Option<Id> {
        self.locals.get(global).copied().flatten()
    }
}

impl<S: ComponentSet> Identify for Identifier<S> {
    #[inline]
    fn component_id<C: Component>(&self) -> Result<TypedId<C>, Error> {
        Identifier::<S>::component_id::<C>(self)
    }

    #[inline]
    fn contains_component<C: Component>(&self) -> bool {
        Identifier::<S>::contains_component::<C>(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Component, Debug)]
    struct Position;

    #[derive(Component, Debug)]
    struct Velocity;

    #[derive(Component, Debug)]
    struct Health;

    #[derive(Component, Debug)]
    #[component(name = "mana")]
    struct Mana;

    struct Nameless;
    impl Component for Nameless {}

    type Statics = (Position, Velocity);

    #[test]
    fn static_ids_are_positions() {
        // Given
        let identifier = Identifier::<Statics>::new();

        // Then
        assert_eq!(identifier.component_id::<Position>().unwrap().index(), 0);
        assert_eq!(identifier.component_id::<Velocity>().unwrap().index(), 1);
        assert!(Identifier::<Statics>::is_static::<Velocity>());
        assert!(!Identifier::<Statics>::is_static::<Health>());
        assert_eq!(identifier.len(), 2);
    }

    #[test]
    fn registered_ids_follow_static_ids() {
        // Given
        let mut identifier = Identifier::<Statics>::new();

        // When
        let health = identifier.register::<Health>();
        let mana = identifier.register::<Mana>();

        // Then
        assert_eq!(health.index(), 2);
        assert_eq!(mana.index(), 3);
        assert_eq!(identifier.component_id::<Health>(), Ok(health));
        assert_eq!(identifier.component_id::<Mana>(), Ok(mana));
        assert_eq!(identifier.len(), 4);
    }

    #[test]
    fn contains_only_after_registration() {
        // Given
        let mut identifier = Identifier::<()>::new();
        assert!(!identifier.contains_component::<Health>());

        // When
        identifier.register::<Health>();

        // Then
        assert!(identifier.contains_component::<Health>());
        assert!(!identifier.contains_component::<Mana>());
    }

    #[test]
    fn unregistered_lookup_names_component() {
        // Given
        let identifier = Identifier::<()>::new();

        // When
        let named = identifier.component_id::<Mana>();
        let nameless = identifier.component_id::<Nameless>();

        // Then
        assert_eq!(named, Err(Error::Unregistered { name: Some("mana") }));
        assert_eq!(
            nameless.unwrap_err().to_string(),
            "Component \"unknown\" was not registered"
        );
    }

    #[test]
    fn duplicate_registration_is_rejected_without_change() {
        // Given
        let mut identifier = Identifier::<Statics>::new();
        let health = identifier.register::<Health>();

        // When
        let again = identifier.try_register::<Health>();
        let static_member = identifier.try_register::<Position>();

        // Then
        assert_eq!(
            again,
            Err(Error::AlreadyRegistered {
                name: Some("Health"),
                id: health.untyped()
            })
        );
        assert_eq!(
            static_member,
            Err(Error::Static {
                name: Some("Position"),
                id: Id::new(0)
            })
        );
        assert_eq!(identifier.len(), 3);
    }

    #[test]
    #[should_panic(expected = "Component \"Health\" is already registered with id 0")]
    fn duplicate_registration_panics() {
        let mut identifier = Identifier::<()>::new();
        identifier.register::<Health>();
        identifier.register::<Health>();
    }

    #[test]
    #[should_panic(expected = "appears more than once")]
    fn repeated_static_member_panics() {
        Identifier::<(Position, Position)>::new();
    }

    #[test]
    fn identifiers_number_independently() {
        // Given
        let mut first = Identifier::<()>::new();
        let mut second = Identifier::<()>::new();

        // When
        first.register::<Health>();
        let first_mana = first.register::<Mana>();
        let second_mana = second.register::<Mana>();

        // Then - no gaps from registrations made elsewhere
        assert_eq!(first_mana.index(), 1);
        assert_eq!(second_mana.index(), 0);
        assert!(!second.contains_component::<Health>());
    }

    #[test]
    fn metadata_by_id() {
        // Given
        let mut identifier = Identifier::<Statics>::new();
        let mana = identifier.register::<Mana>();

        // Then
        let velocity = identifier.metadata(Id::new(1)).unwrap();
        assert_eq!(velocity.name(), Some("Velocity"));
        assert_eq!(identifier.metadata(mana.untyped()).unwrap().name(), Some("mana"));
        assert!(identifier.metadata(Id::new(3)).is_none());
        let names: Vec<_> = identifier.components().filter_map(Metadata::name).collect();
        assert_eq!(names, vec!["Position", "Velocity", "mana"]);
    }

    #[test]
    fn component_ids_of_sets() {
        // Given
        let mut identifier = Identifier::<Statics>::new();
        identifier.register::<Mana>();

        // When
        let ids = identifier.component_ids::<(Mana, Position)>().unwrap();
        let spec = identifier.ordered_component_ids::<(Mana, Position)>().unwrap();
        let missing = identifier.component_ids::<(Position, Health)>();

        // Then
        assert_eq!(ids, vec![Id::new(2), Id::new(0)]);
        assert_eq!(spec.ids(), &[Id::new(0), Id::new(2)]);
        assert_eq!(missing, Err(Error::Unregistered { name: Some("Health") }));
    }
}
