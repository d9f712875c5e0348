use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{Margin, PolarSettings, Size};
use crate::element::{CollectionObserver, Observers, PropertyId, PropertyListener, SubscriptionToken};
use crate::model::{
    Axis, AxisRole, ChartSeries, LegendEntry, Section, SharedAxis, SharedSection, SharedSeries,
    shared_axis,
};
use crate::sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LegendPosition {
    #[default]
    Hidden,
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TooltipPosition {
    Hidden,
    #[default]
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

/// Animation settings carried through a pass for downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationSettings {
    pub enabled: bool,
    pub duration: Duration,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: Duration::from_millis(800),
        }
    }
}

/// Legend widget drawn outside the engine.
pub trait Legend: Send + Sync {
    fn draw(&self, entries: &[LegendEntry], position: LegendPosition);
}

/// What a chart reads from its host control at the start of every pass.
pub trait ChartView: Send + Sync {
    fn series(&self) -> Vec<SharedSeries>;

    fn axes(&self, role: AxisRole) -> Vec<SharedAxis>;

    fn sections(&self) -> Vec<SharedSection>;

    fn control_size(&self) -> Size;

    /// Explicit draw margin; `None` lets the engine compute it.
    fn draw_margin(&self) -> Option<Margin>;

    fn legend(&self) -> Option<Arc<dyn Legend>>;

    fn legend_position(&self) -> LegendPosition;

    fn tooltip_position(&self) -> TooltipPosition;

    fn animations(&self) -> AnimationSettings;

    fn polar_settings(&self) -> PolarSettings;

    fn designer_mode(&self) -> bool;

    /// Listens to structural and per-element changes of the view.
    fn subscribe(&self, listener: PropertyListener) -> SubscriptionToken;

    fn unsubscribe(&self, token: SubscriptionToken) -> bool;
}

struct ViewInner {
    series: Vec<SharedSeries>,
    axes: HashMap<AxisRole, Vec<SharedAxis>>,
    sections: Vec<SharedSection>,
    control_size: Size,
    draw_margin: Option<Margin>,
    legend: Option<Arc<dyn Legend>>,
    legend_position: LegendPosition,
    tooltip_position: TooltipPosition,
    animations: AnimationSettings,
    polar_settings: PolarSettings,
    designer_mode: bool,
}

const ROLES: [AxisRole; 4] = [AxisRole::X, AxisRole::Y, AxisRole::Angle, AxisRole::Radius];

fn structural_id(role: AxisRole) -> PropertyId {
    match role {
        AxisRole::X => PropertyId::XAxes,
        AxisRole::Y => PropertyId::YAxes,
        AxisRole::Angle => PropertyId::AngleAxes,
        AxisRole::Radius => PropertyId::RadiusAxes,
    }
}

/// In-memory view used by headless hosts and tests.
///
/// Starts with one axis per role. Collections are observed at two levels:
/// replacing a collection and changing any element in it both reach the
/// view's listeners.
pub struct ChartViewState {
    inner: RwLock<ViewInner>,
    listeners: Arc<Mutex<Observers>>,
    series_observer: Mutex<CollectionObserver<dyn ChartSeries>>,
    axes_observers: Mutex<HashMap<AxisRole, CollectionObserver<Axis>>>,
    sections_observer: Mutex<CollectionObserver<Section>>,
}

impl Default for ChartViewState {
    fn default() -> Self {
        Self::new(Size::default())
    }
}

impl ChartViewState {
    #[must_use]
    pub fn new(control_size: Size) -> Self {
        let listeners = Arc::new(Mutex::new(Observers::new()));
        let forward = forwarder(&listeners);

        let axes: HashMap<AxisRole, Vec<SharedAxis>> = ROLES
            .into_iter()
            .map(|role| (role, vec![shared_axis(Axis::new(role))]))
            .collect();
        let axes_observers = axes
            .iter()
            .map(|(role, items)| {
                let mut observer = CollectionObserver::new(structural_id(*role), Arc::clone(&forward));
                observer.initialize(items);
                (*role, observer)
            })
            .collect();

        Self {
            inner: RwLock::new(ViewInner {
                series: Vec::new(),
                axes,
                sections: Vec::new(),
                control_size,
                draw_margin: None,
                legend: None,
                legend_position: LegendPosition::Hidden,
                tooltip_position: TooltipPosition::default(),
                animations: AnimationSettings::default(),
                polar_settings: PolarSettings::default(),
                designer_mode: false,
            }),
            series_observer: Mutex::new(CollectionObserver::new(
                PropertyId::Series,
                Arc::clone(&forward),
            )),
            axes_observers: Mutex::new(axes_observers),
            sections_observer: Mutex::new(CollectionObserver::new(PropertyId::Sections, forward)),
            listeners,
        }
    }

    pub fn set_series(&self, series: Vec<SharedSeries>) {
        sync::write(&self.inner).series = series.clone();
        sync::lock(&self.series_observer).replace(&series);
    }

    pub fn add_series(&self, series: SharedSeries) {
        sync::write(&self.inner).series.push(Arc::clone(&series));
        sync::lock(&self.series_observer).push(&series);
    }

    /// Removes `series` by identity. Returns `false` if it was not present.
    pub fn remove_series(&self, series: &SharedSeries) -> bool {
        {
            let mut inner = sync::write(&self.inner);
            let before = inner.series.len();
            inner.series.retain(|current| !Arc::ptr_eq(current, series));
            if inner.series.len() == before {
                return false;
            }
        }
        sync::lock(&self.series_observer).remove(series);
        true
    }

    pub fn set_axes(&self, role: AxisRole, axes: Vec<SharedAxis>) {
        sync::write(&self.inner).axes.insert(role, axes.clone());
        let mut observers = sync::lock(&self.axes_observers);
        if let Some(observer) = observers.get_mut(&role) {
            observer.replace(&axes);
        }
    }

    pub fn set_sections(&self, sections: Vec<SharedSection>) {
        sync::write(&self.inner).sections = sections.clone();
        sync::lock(&self.sections_observer).replace(&sections);
    }

    pub fn add_section(&self, section: SharedSection) {
        sync::write(&self.inner).sections.push(Arc::clone(&section));
        sync::lock(&self.sections_observer).push(&section);
    }

    pub fn set_control_size(&self, size: Size) {
        self.update(PropertyId::ControlSize, |inner| {
            replace_if_changed(&mut inner.control_size, size)
        });
    }

    pub fn set_draw_margin(&self, margin: Option<Margin>) {
        self.update(PropertyId::DrawMargin, |inner| {
            replace_if_changed(&mut inner.draw_margin, margin)
        });
    }

    pub fn set_legend(&self, legend: Option<Arc<dyn Legend>>) {
        self.update(PropertyId::Legend, |inner| {
            inner.legend = legend;
            true
        });
    }

    pub fn set_legend_position(&self, position: LegendPosition) {
        self.update(PropertyId::LegendPosition, |inner| {
            replace_if_changed(&mut inner.legend_position, position)
        });
    }

    pub fn set_tooltip_position(&self, position: TooltipPosition) {
        self.update(PropertyId::TooltipPosition, |inner| {
            replace_if_changed(&mut inner.tooltip_position, position)
        });
    }

    pub fn set_animations(&self, animations: AnimationSettings) {
        self.update(PropertyId::Animations, |inner| {
            replace_if_changed(&mut inner.animations, animations)
        });
    }

    pub fn set_polar_settings(&self, settings: PolarSettings) {
        self.update(PropertyId::PolarSettings, |inner| {
            replace_if_changed(&mut inner.polar_settings, settings)
        });
    }

    pub fn set_designer_mode(&self, enabled: bool) {
        self.update(PropertyId::DesignerMode, |inner| {
            replace_if_changed(&mut inner.designer_mode, enabled)
        });
    }

    /// Number of elements currently observed per collection, in the order
    /// series, axes (all roles), sections.
    #[must_use]
    pub fn observed_counts(&self) -> (usize, usize, usize) {
        let axes = sync::lock(&self.axes_observers)
            .values()
            .map(CollectionObserver::observed_count)
            .sum();
        (
            sync::lock(&self.series_observer).observed_count(),
            axes,
            sync::lock(&self.sections_observer).observed_count(),
        )
    }

    fn update(&self, id: PropertyId, apply: impl FnOnce(&mut ViewInner) -> bool) {
        let changed = apply(&mut sync::write(&self.inner));
        if changed {
            notify(&self.listeners, id);
        }
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn notify(listeners: &Mutex<Observers>, id: PropertyId) {
    // listeners run without the list lock held
    let snapshot = sync::lock(listeners).snapshot();
    for listener in snapshot {
        listener(id);
    }
}

fn forwarder(listeners: &Arc<Mutex<Observers>>) -> PropertyListener {
    let listeners = Arc::clone(listeners);
    Arc::new(move |id| notify(&listeners, id))
}

impl ChartView for ChartViewState {
    fn series(&self) -> Vec<SharedSeries> {
        sync::read(&self.inner).series.clone()
    }

    fn axes(&self, role: AxisRole) -> Vec<SharedAxis> {
        sync::read(&self.inner)
            .axes
            .get(&role)
            .cloned()
            .unwrap_or_default()
    }

    fn sections(&self) -> Vec<SharedSection> {
        sync::read(&self.inner).sections.clone()
    }

    fn control_size(&self) -> Size {
        sync::read(&self.inner).control_size
    }

    fn draw_margin(&self) -> Option<Margin> {
        sync::read(&self.inner).draw_margin
    }

    fn legend(&self) -> Option<Arc<dyn Legend>> {
        sync::read(&self.inner).legend.clone()
    }

    fn legend_position(&self) -> LegendPosition {
        sync::read(&self.inner).legend_position
    }

    fn tooltip_position(&self) -> TooltipPosition {
        sync::read(&self.inner).tooltip_position
    }

    fn animations(&self) -> AnimationSettings {
        sync::read(&self.inner).animations
    }

    fn polar_settings(&self) -> PolarSettings {
        sync::read(&self.inner).polar_settings
    }

    fn designer_mode(&self) -> bool {
        sync::read(&self.inner).designer_mode
    }

    fn subscribe(&self, listener: PropertyListener) -> SubscriptionToken {
        sync::lock(&self.listeners).subscribe(listener)
    }

    fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        sync::lock(&self.listeners).unsubscribe(token)
    }
}

impl std::fmt::Debug for ChartViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = sync::read(&self.inner);
        f.debug_struct("ChartViewState")
            .field("series", &inner.series.len())
            .field("sections", &inner.sections.len())
            .field("control_size", &inner.control_size)
            .field("draw_margin", &inner.draw_margin)
            .field("legend_position", &inner.legend_position)
            .field("designer_mode", &inner.designer_mode)
            .finish_non_exhaustive()
    }
}
