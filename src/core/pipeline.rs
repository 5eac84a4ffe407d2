//! Update pipeline
//!
//! Every change runs the same sequence under one lock:
//! mutate → save overlay → regenerate stylesheet → notify.
//! A failing step stops the ones after it and is returned to the caller,
//! except notification, which is best-effort.

use crate::core::color::{ColorBook, ColorLookup, HexColor};
use crate::core::error::{ColorError, Result};
use crate::core::notify::InvalidationNotifier;
use crate::core::palette::DefaultPalette;
use crate::core::registry::{ColorAssignment, ColorRegistry, UserId};
use crate::core::rooms::RoomSource;
use crate::core::store::Store;
use crate::core::stylesheet::{StylesheetGenerator, TEMPLATE_MARKER};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Change to the registry
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Give a user a custom color
    Assign {
        user: String,
        assignment: ColorAssignment,
    },
    /// Remove a user's custom color
    Remove { user: String },
}

impl Mutation {
    pub fn assign(user: &str, assignment: ColorAssignment) -> Self {
        Self::Assign {
            user: user.to_string(),
            assignment,
        }
    }

    pub fn remove(user: &str) -> Self {
        Self::Remove {
            user: user.to_string(),
        }
    }
}

/// Owner of the registry and everything derived from it
pub struct UpdatePipeline {
    registry: Mutex<ColorRegistry>,
    colors: RwLock<ColorBook>,
    store: Store,
    rooms: Arc<dyn RoomSource>,
    notifier: Arc<dyn InvalidationNotifier>,
}

impl UpdatePipeline {
    /// Wrap an already populated registry
    pub fn new(
        registry: ColorRegistry,
        store: Store,
        rooms: Arc<dyn RoomSource>,
        notifier: Arc<dyn InvalidationNotifier>,
    ) -> Self {
        let colors = ColorBook::from_registry(&registry);
        Self {
            registry: Mutex::new(registry),
            colors: RwLock::new(colors),
            store,
            rooms,
            notifier,
        }
    }

    /// Start up from disk
    ///
    /// The template must exist and contain the substitution marker. Saved
    /// overrides are merged over the defaults; if there were any, the
    /// stylesheet is regenerated right away.
    pub fn open(
        defaults: Arc<DefaultPalette>,
        store: Store,
        rooms: Arc<dyn RoomSource>,
        notifier: Arc<dyn InvalidationNotifier>,
    ) -> Result<Self> {
        if !store.read_template()?.contains(TEMPLATE_MARKER) {
            return Err(ColorError::TemplateMarkerMissing(TEMPLATE_MARKER));
        }

        let outcome = store.load();
        let loaded = outcome.is_loaded();
        let mut registry = ColorRegistry::new(defaults);
        registry.merge_persisted(outcome.into_overlay());
        tracing::info!(
            defaults = registry.defaults().len(),
            overrides = registry.override_count(),
            "Color registry loaded"
        );

        let pipeline = Self::new(registry, store, rooms, notifier);
        if loaded {
            pipeline.deploy()?;
        }
        Ok(pipeline)
    }

    /// Apply a mutation and propagate it
    ///
    /// Returns the normalized id that was changed. If saving fails the
    /// registry is put back, so memory never runs ahead of disk.
    pub fn apply(&self, mutation: Mutation) -> Result<UserId> {
        let mut registry = self.registry.lock();

        let (id, previous) = match mutation {
            Mutation::Assign { user, assignment } => (registry.assign(&user, assignment)?, None),
            Mutation::Remove { user } => {
                let (id, previous) = registry.remove(&user)?;
                (id, Some(previous))
            }
        };

        if let Err(e) = self.store.save(&registry.persisted_overlay()) {
            tracing::error!(user = %id, "Saving color data failed: {}", e);
            registry.restore(id, previous);
            return Err(e);
        }

        *self.colors.write() = ColorBook::from_registry(&registry);
        self.regenerate(&registry)?;
        self.notifier.notify();

        tracing::info!(
            user = %id,
            removed = previous.is_some(),
            "Custom color updated"
        );
        Ok(id)
    }

    /// Regenerate the stylesheet without changing the registry
    ///
    /// Returns the number of users with rules.
    pub fn deploy(&self) -> Result<usize> {
        let registry = self.registry.lock();
        self.regenerate(&registry)
    }

    fn regenerate(&self, registry: &ColorRegistry) -> Result<usize> {
        let template = self.store.read_template()?;
        let rooms = self.rooms.snapshot();
        let css = {
            let colors = self.colors.read();
            StylesheetGenerator::new(&*colors).generate(registry, &rooms, &template)?
        };
        self.store.write_stylesheet(&css)?;

        let count = registry.overlay_entries().len();
        tracing::debug!(
            path = %self.store.stylesheet_path().display(),
            users = count,
            "Stylesheet written"
        );
        Ok(count)
    }

    /// Current assignment for a user (override, else default)
    pub fn resolve(&self, user: &str) -> Option<ColorAssignment> {
        self.registry.lock().resolve(user).cloned()
    }

    /// Color a user's name renders with
    pub fn color_of(&self, user: &str) -> HexColor {
        self.colors.read().get(user)
    }

    /// Copy of the registry
    pub fn snapshot(&self) -> ColorRegistry {
        self.registry.lock().clone()
    }

    /// Backing store
    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl std::fmt::Debug for UpdatePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdatePipeline")
            .field("store", &self.store)
            .field("overrides", &self.registry.lock().override_count())
            .finish_non_exhaustive()
    }
}
