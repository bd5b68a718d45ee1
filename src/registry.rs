//! Attachment of sticky controllers to table elements.
//!
//! Each attached table carries an instance marker in its dataset
//! (`data-sticky-row-table="<id>"` by default) that keys into an explicit map
//! of controllers. The map also owns the viewport listeners, so detaching a
//! table unsubscribes its handlers and frees the controller.

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::config::StickyConfig;
use crate::controller::StickyRowTable;
use crate::error::Result;
use crate::host::{HostElement, ViewportEvent, ViewportGeometry};

struct Attached<E, V: ViewportGeometry> {
    table: Rc<StickyRowTable<E, V>>,
    listeners: Vec<V::Listener>,
}

/// All sticky controllers sharing one viewport.
pub struct StickyRows<E, V: ViewportGeometry> {
    viewport: V,
    config: StickyConfig,
    next_id: u64,
    tables: HashMap<u64, Attached<E, V>>,
}

impl<E, V> StickyRows<E, V>
where
    E: HostElement + 'static,
    V: ViewportGeometry + Clone + 'static,
{
    pub fn new(viewport: V) -> Self {
        Self::with_config(viewport, StickyConfig::default())
    }

    /// Use `config` for every table attached without its own configuration.
    pub fn with_config(viewport: V, config: StickyConfig) -> Self {
        Self {
            viewport,
            config,
            next_id: 1,
            tables: HashMap::new(),
        }
    }

    pub fn config(&self) -> &StickyConfig {
        &self.config
    }

    /// Attach a controller to `element` with the default configuration.
    ///
    /// Attaching an element that already has a controller returns the existing
    /// one and changes nothing.
    ///
    /// # Errors
    /// Propagates host failures from building the controller or subscribing
    /// to viewport events.
    pub fn attach(&mut self, element: &E) -> Result<Rc<StickyRowTable<E, V>>> {
        let config = self.config.clone();
        self.attach_with(element, config)
    }

    /// Attach a controller to `element` with a table-specific configuration.
    ///
    /// The instance marker key always comes from the registry configuration.
    ///
    /// # Errors
    /// Same as [`attach`](Self::attach).
    pub fn attach_with(
        &mut self,
        element: &E,
        mut config: StickyConfig,
    ) -> Result<Rc<StickyRowTable<E, V>>> {
        if let Some(existing) = self.get(element) {
            return Ok(existing);
        }

        config.marker_key.clone_from(&self.config.marker_key);
        let table = Rc::new(StickyRowTable::new(
            element.clone(),
            self.viewport.clone(),
            config,
        )?);
        let listeners = vec![
            self.viewport.listen(
                ViewportEvent::Scroll,
                handler(Rc::downgrade(&table), ViewportEvent::Scroll),
            )?,
            self.viewport.listen(
                ViewportEvent::Resize,
                handler(Rc::downgrade(&table), ViewportEvent::Resize),
            )?,
        ];

        let id = self.next_id;
        self.next_id += 1;
        element.set_data(&self.config.marker_key, &id.to_string())?;
        self.tables.insert(
            id,
            Attached {
                table: Rc::clone(&table),
                listeners,
            },
        );
        log::debug!("[registry] attached sticky table #{id}");
        Ok(table)
    }

    /// Controller attached to `element`, if any.
    pub fn get(&self, element: &E) -> Option<Rc<StickyRowTable<E, V>>> {
        self.find(element)
            .and_then(|id| self.tables.get(&id))
            .map(|attached| Rc::clone(&attached.table))
    }

    pub fn is_attached(&self, element: &E) -> bool {
        self.find(element).is_some()
    }

    /// Detach the controller from `element`: unsubscribe its handlers, remove
    /// the overlay and clear the instance marker.
    ///
    /// Returns `false` if nothing was attached.
    ///
    /// # Errors
    /// Propagates host failures while removing the overlay or the marker.
    pub fn detach(&mut self, element: &E) -> Result<bool> {
        let Some(id) = self.find(element) else {
            return Ok(false);
        };
        let Some(attached) = self.tables.remove(&id) else {
            return Ok(false);
        };
        drop(attached.listeners);
        attached.table.remove_overlay()?;
        element.remove_data(&self.config.marker_key)?;
        log::debug!("[registry] detached sticky table #{id}");
        Ok(true)
    }

    /// Re-scan the sticky rows of an attached table.
    ///
    /// Returns `false` if `element` has no controller.
    ///
    /// # Errors
    /// Propagates [`StickyRowTable::rebuild_rows`] failures.
    pub fn rebuild(&self, element: &E) -> Result<bool> {
        let Some(table) = self.get(element) else {
            return Ok(false);
        };
        table.rebuild_rows()?;
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    // Deep clones of an attached table carry its marker, so the id alone is
    // not proof of attachment.
    fn find(&self, element: &E) -> Option<u64> {
        let id = element.data(&self.config.marker_key)?.parse().ok()?;
        let attached = self.tables.get(&id)?;
        attached.table.table().same_node(element).then_some(id)
    }
}

fn handler<E, V>(table: Weak<StickyRowTable<E, V>>, event: ViewportEvent) -> Box<dyn FnMut()>
where
    E: HostElement + 'static,
    V: ViewportGeometry + 'static,
{
    Box::new(move || {
        let Some(table) = table.upgrade() else {
            return;
        };
        let result = match event {
            ViewportEvent::Scroll => table.redraw(false),
            ViewportEvent::Resize => table.calculate_dimensions(),
        };
        if let Err(e) = result {
            log::warn!("[registry] {} handler failed: {e}", event.as_str());
        }
    })
}
