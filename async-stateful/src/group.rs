use crate::{AsyncError, AsyncState, CreateOptions, StateCell};
use futures_signals::signal::{Mutable, MutableSignalCloned, SignalExt, SignalStream};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type KeyFn<K> = Arc<dyn Fn(&K) -> String + Send + Sync>;

/// A keyed collection of independent [`AsyncState`] elements.
///
/// The group carries its own container lifecycle (e.g. for loading the whole
/// collection at once), the aggregate map of values, and one element state per
/// key. The aggregate map is the only place values are kept: whenever an
/// element or the container resolves, its values are merged into it by key and
/// other keys are never touched.
///
/// Element generations never go backwards for a key, even across a group
/// [`reset`](AsyncStateGroup::reset) or [`set_element`](AsyncStateGroup::set_element),
/// so an update started before either can not settle the element afterwards.
pub struct AsyncStateGroup<T, K: ?Sized> {
    container: AsyncState<()>,
    defaults: HashMap<String, T>,
    values: HashMap<String, T>,
    elements: HashMap<String, AsyncState<T>>,
    retired: HashMap<String, u64>,
    get_key: KeyFn<K>,
}

impl<T: Clone, K: ?Sized> Clone for AsyncStateGroup<T, K> {
    fn clone(&self) -> Self {
        AsyncStateGroup {
            container: self.container.clone(),
            defaults: self.defaults.clone(),
            values: self.values.clone(),
            elements: self.elements.clone(),
            retired: self.retired.clone(),
            get_key: self.get_key.clone(),
        }
    }
}

impl<T: fmt::Debug, K: ?Sized> fmt::Debug for AsyncStateGroup<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncStateGroup")
            .field("container", &self.container)
            .field("values", &self.values)
            .field("elements", &self.elements)
            .finish_non_exhaustive()
    }
}

impl<T: Clone, K: ?Sized> AsyncStateGroup<T, K> {
    /// An empty group. `get_key` must map each key to a stable, unique id.
    pub fn new<F>(get_key: F) -> Self
    where
        F: Fn(&K) -> String + Send + Sync + 'static,
    {
        AsyncStateGroup {
            container: AsyncState::new(None),
            defaults: HashMap::new(),
            values: HashMap::new(),
            elements: HashMap::new(),
            retired: HashMap::new(),
            get_key: Arc::new(get_key),
        }
    }

    /// Seeds the aggregate values, keyed through `get_key`.
    pub fn with_default_values<I>(self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Borrow<K>,
    {
        let defaults: HashMap<String, T> = values
            .into_iter()
            .map(|value| ((self.get_key)(value.borrow()), value))
            .collect();
        AsyncStateGroup {
            values: defaults.clone(),
            defaults,
            ..self
        }
    }

    pub fn with_options(self, options: CreateOptions<()>) -> Self {
        AsyncStateGroup {
            container: AsyncState::create(None, options),
            ..self
        }
    }

    pub fn key_of(&self, key: &K) -> String {
        (self.get_key)(key)
    }

    /// The group's own lifecycle. Carries no value, see [`values`](Self::values).
    pub fn container(&self) -> &AsyncState<()> {
        &self.container
    }

    /// The aggregate values, one entry per resolved or seeded key.
    pub fn values(&self) -> &HashMap<String, T> {
        &self.values
    }

    pub fn value_of(&self, key: &K) -> Option<&T> {
        self.values.get(&self.key_of(key))
    }

    pub fn elements(&self) -> &HashMap<String, AsyncState<T>> {
        &self.elements
    }

    pub fn element(&self, key: &K) -> Option<&AsyncState<T>> {
        self.elements.get(&self.key_of(key))
    }

    /// The element for `key`, or a fresh pristine state if it was never set.
    pub fn get_or_create_element(&self, key: &K) -> AsyncState<T> {
        self.element_by_id(&self.key_of(key))
    }

    /// Replaces the element for `key`, starting a new lineage for it.
    ///
    /// Updates in flight on the replaced element are fenced out.
    pub fn set_element(mut self, key: &K, state: AsyncState<T>) -> Self {
        let id = self.key_of(key);
        let replaced = self.element_by_id(&id).generation();
        self.put_element(id, state.fenced_after(replaced));
        self
    }

    pub fn reset_element(self, key: &K) -> Self {
        self.transition_element(key, AsyncState::reset)
    }

    pub fn submit_element(self, key: &K) -> Self {
        self.transition_element(key, AsyncState::submit)
    }

    pub fn refresh_element(self, key: &K) -> Self {
        self.transition_element(key, AsyncState::refresh)
    }

    pub fn resolve_element(self, key: &K, value: T) -> Self {
        self.transition_element(key, |state| state.resolve(value))
    }

    pub fn reject_element(self, key: &K, error: AsyncError) -> Self {
        self.transition_element(key, |state| state.reject(error))
    }

    pub fn cancel_element(self, key: &K) -> Self {
        self.transition_element(key, AsyncState::cancel)
    }

    pub fn submit(self) -> Self {
        AsyncStateGroup {
            container: self.container.submit(),
            ..self
        }
    }

    pub fn refresh(self) -> Self {
        AsyncStateGroup {
            container: self.container.refresh(),
            ..self
        }
    }

    /// Resolves the container with a bulk result, merging it into the values.
    pub fn resolve(mut self, values: HashMap<String, T>) -> Self {
        self.values.extend(values);
        AsyncStateGroup {
            container: self.container.resolve(()),
            ..self
        }
    }

    pub fn reject(self, error: AsyncError) -> Self {
        AsyncStateGroup {
            container: self.container.reject(error),
            ..self
        }
    }

    pub fn cancel(self) -> Self {
        AsyncStateGroup {
            container: self.container.cancel(),
            ..self
        }
    }

    /// Back to the seeded values with no element states.
    pub fn reset(mut self) -> Self {
        for (id, element) in self.elements.drain() {
            self.retired.insert(id, element.generation());
        }
        AsyncStateGroup {
            container: self.container.reset(),
            values: self.defaults.clone(),
            ..self
        }
    }

    fn transition_element<F>(mut self, key: &K, transition: F) -> Self
    where
        F: FnOnce(AsyncState<T>) -> AsyncState<T>,
    {
        let id = self.key_of(key);
        let state = transition(self.element_by_id(&id));
        self.put_element(id, state);
        self
    }

    fn element_by_id(&self, id: &str) -> AsyncState<T> {
        match (self.elements.get(id), self.retired.get(id)) {
            (Some(element), _) => element.clone(),
            (None, Some(&retired)) => AsyncState::default().fenced_after(retired),
            (None, None) => AsyncState::default(),
        }
    }

    fn put_element(&mut self, id: String, state: AsyncState<T>) {
        if let Some(value) = state.phase().value_ref().filter(|_| state.is_resolved()) {
            self.values.insert(id.clone(), value.clone());
        }
        self.elements.insert(id, state);
    }
}

/// A shared, observable [`AsyncStateGroup`].
pub struct GroupCell<T, K: ?Sized> {
    group: Mutable<AsyncStateGroup<T, K>>,
}

impl<T, K: ?Sized> Clone for GroupCell<T, K> {
    fn clone(&self) -> Self {
        GroupCell {
            group: self.group.clone(),
        }
    }
}

impl<T: Clone, K: ?Sized> GroupCell<T, K> {
    pub fn new(group: AsyncStateGroup<T, K>) -> Self {
        GroupCell {
            group: Mutable::new(group),
        }
    }

    pub fn get(&self) -> AsyncStateGroup<T, K> {
        self.group.get_cloned()
    }

    pub fn replace<F>(&self, updater: F) -> AsyncStateGroup<T, K>
    where
        F: FnOnce(AsyncStateGroup<T, K>) -> AsyncStateGroup<T, K>,
    {
        let mut group = self.group.lock_mut();
        *group = updater((*group).clone());
        (*group).clone()
    }

    /// A cell over the element for `key`; updates through it share this group.
    pub fn element(&self, key: &K) -> ElementCell<T, K> {
        ElementCell {
            group: self.group.clone(),
            id: self.group.lock_ref().key_of(key),
        }
    }

    pub fn to_signal(&self) -> MutableSignalCloned<AsyncStateGroup<T, K>> {
        self.group.signal_cloned()
    }

    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<AsyncStateGroup<T, K>>> {
        self.group.signal_cloned().to_stream()
    }
}

/// A [`StateCell`] scoped to one element of a [`GroupCell`].
pub struct ElementCell<T, K: ?Sized> {
    group: Mutable<AsyncStateGroup<T, K>>,
    id: String,
}

impl<T, K: ?Sized> Clone for ElementCell<T, K> {
    fn clone(&self) -> Self {
        ElementCell {
            group: self.group.clone(),
            id: self.id.clone(),
        }
    }
}

impl<T, K: ?Sized> ElementCell<T, K> {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl<T: Clone, K: ?Sized> StateCell<T> for ElementCell<T, K> {
    fn get(&self) -> AsyncState<T> {
        self.group.lock_ref().element_by_id(&self.id)
    }

    fn try_replace<F>(&self, updater: F) -> Result<AsyncState<T>, AsyncState<T>>
    where
        F: FnOnce(&AsyncState<T>) -> Option<AsyncState<T>>,
    {
        let mut group = self.group.lock_mut();
        let current = group.element_by_id(&self.id);
        match updater(&current) {
            Some(next) => {
                group.put_element(self.id.clone(), next.clone());
                Ok(next)
            }
            None => Err(current),
        }
    }
}
