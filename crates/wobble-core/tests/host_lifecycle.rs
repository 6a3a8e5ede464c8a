use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wobble_core::formulas;
use wobble_core::{
    CanvasHost, Formula, FormulaId, HostConfig, HostError, HostState, NodeId, NodeKind, Scene,
    SceneConstructor, SceneError, SceneGraph, Style, Surface, SurfaceError, ValueRecord,
    ValueStore,
};

#[derive(Default)]
struct Counters {
    inits: u32,
    draws: u32,
    releases: u32,
    fail_init: bool,
    fail_draw: bool,
}

#[derive(Clone, Default)]
struct MockSurface(Rc<RefCell<Counters>>);

impl Surface for MockSurface {
    fn init(&mut self, _config: &HostConfig) -> Result<(), SurfaceError> {
        let mut c = self.0.borrow_mut();
        c.inits += 1;
        if c.fail_init {
            return Err(SurfaceError("no context".into()));
        }
        Ok(())
    }

    fn draw(&mut self, _graph: &SceneGraph, _config: &HostConfig) -> Result<(), SurfaceError> {
        let mut c = self.0.borrow_mut();
        c.draws += 1;
        if c.fail_draw {
            return Err(SurfaceError("context lost".into()));
        }
        Ok(())
    }

    fn release(&mut self) {
        self.0.borrow_mut().releases += 1;
    }
}

thread_local! {
    static EVENTS: RefCell<Vec<String>> = RefCell::new(Vec::new());
    static FAIL_CONSTRUCT: Cell<bool> = Cell::new(false);
    static FAIL_UPDATE: Cell<bool> = Cell::new(false);
}

fn push(event: String) {
    EVENTS.with(|e| e.borrow_mut().push(event));
}

fn take_events() -> Vec<String> {
    EVENTS.with(|e| std::mem::take(&mut *e.borrow_mut()))
}

struct RecordingScene {
    formula: FormulaId,
    container: Option<NodeId>,
}

impl RecordingScene {
    fn construct(
        graph: &mut SceneGraph,
        formula: &'static Formula,
    ) -> Result<Box<dyn Scene>, SceneError> {
        let attached = graph.children(graph.root()).len();
        push(format!("construct {} attached={}", formula.id.slug(), attached));
        let mut b = graph.build_container();
        b.add(NodeKind::Circle { radius: 4.0 }, Style::default());
        if FAIL_CONSTRUCT.with(|f| f.get()) {
            return Err(SceneError::Failed(formula.id, "forced".into()));
        }
        Ok(Box::new(Self {
            formula: formula.id,
            container: Some(b.finish()),
        }))
    }
}

impl Scene for RecordingScene {
    fn formula(&self) -> FormulaId {
        self.formula
    }

    fn container(&self) -> Option<NodeId> {
        self.container
    }

    fn update(&mut self, _graph: &mut SceneGraph, record: &ValueRecord) -> Result<(), SceneError> {
        push(format!("update {} epoch={}", self.formula.slug(), record.epoch()));
        if FAIL_UPDATE.with(|f| f.get()) {
            return Err(SceneError::InvalidValue {
                symbol: "forced",
                value: f64::NAN,
            });
        }
        Ok(())
    }

    fn tick(&mut self, _graph: &mut SceneGraph, _dt: f32) {}

    fn destroy(&mut self, graph: &mut SceneGraph) {
        if let Some(id) = self.container.take() {
            push(format!("destroy {}", self.formula.slug()));
            graph.remove(id);
        }
    }
}

fn recording_resolver(id: FormulaId) -> Option<SceneConstructor> {
    match id {
        FormulaId::MassEnergy => None,
        _ => Some(RecordingScene::construct as SceneConstructor),
    }
}

fn recording_host() -> (CanvasHost<MockSurface>, MockSurface) {
    FAIL_CONSTRUCT.with(|f| f.set(false));
    FAIL_UPDATE.with(|f| f.set(false));
    take_events();
    let surface = MockSurface::default();
    let mut host = CanvasHost::new(surface.clone(), HostConfig::default()).with_resolver(recording_resolver);
    host.init().unwrap();
    (host, surface)
}

#[test]
fn switching_destroys_exactly_once_before_constructing() {
    let (mut host, _surface) = recording_host();
    host.select(FormulaId::NewtonSecondLaw, 0);
    host.select(FormulaId::OhmsLaw, 0);
    host.select(FormulaId::HookesLaw, 0);
    assert_eq!(
        take_events(),
        vec![
            "construct newton-second-law attached=0",
            "destroy newton-second-law",
            "construct ohms-law attached=0",
            "destroy ohms-law",
            "construct hookes-law attached=0",
        ]
    );
    assert_eq!(host.graph().children(host.graph().root()).len(), 1);
    assert_eq!(host.active_formula(), Some(FormulaId::HookesLaw));
}

#[test]
fn unregistered_formula_shows_nothing_without_error() {
    let (mut host, _surface) = recording_host();
    host.select(FormulaId::OhmsLaw, 0);
    host.select(FormulaId::MassEnergy, 0);
    assert_eq!(host.state(), HostState::Ready);
    assert!(host.error().is_none());
    assert!(host.active_formula().is_none());
    assert!(host.graph().is_empty());
    host.frame(0.016);
    let store = ValueStore::new(FormulaId::MassEnergy);
    host.update(store.record());
    assert_eq!(host.state(), HostState::Ready);
}

#[test]
fn stale_records_are_dropped() {
    let (mut host, _surface) = recording_host();
    let mut store = ValueStore::new(FormulaId::OhmsLaw);
    store.select(FormulaId::NewtonSecondLaw);
    let old = store.record().clone();
    store.select(FormulaId::OhmsLaw);
    host.select(FormulaId::OhmsLaw, store.epoch());
    take_events();

    host.update(&old);
    assert!(take_events().is_empty());

    let current = store.record().clone();
    host.update(&current);
    store.select(FormulaId::OhmsLaw);
    host.update(store.record());
    // an older OhmsLaw record arriving late
    host.update(&current);
    assert_eq!(
        take_events(),
        vec![
            format!("update ohms-law epoch={}", current.epoch()),
            format!("update ohms-law epoch={}", store.epoch()),
        ]
    );
}

#[test]
fn update_failure_freezes_until_retry_reapplies_last_record() {
    let (mut host, _surface) = recording_host();
    let mut store = ValueStore::new(FormulaId::KineticEnergy);
    host.select(FormulaId::KineticEnergy, store.epoch());
    FAIL_UPDATE.with(|f| f.set(true));
    host.update(store.record());
    assert_eq!(host.state(), HostState::SceneError);
    assert!(matches!(host.error(), Some(HostError::SceneUpdate { .. })));

    store.set_input("m", 4.0).unwrap();
    take_events();
    host.update(store.record());
    assert!(take_events().is_empty());

    FAIL_UPDATE.with(|f| f.set(false));
    host.retry().unwrap();
    assert_eq!(host.state(), HostState::SceneActive);
    assert!(host.error().is_none());
    assert_eq!(
        take_events(),
        vec![
            "destroy kinetic-energy".to_string(),
            "construct kinetic-energy attached=0".to_string(),
            format!("update kinetic-energy epoch={}", store.epoch()),
        ]
    );
}

#[test]
fn construct_failure_leaves_no_nodes_and_retry_recovers() {
    let (mut host, _surface) = recording_host();
    FAIL_CONSTRUCT.with(|f| f.set(true));
    host.select(FormulaId::WaveSpeed, 0);
    assert_eq!(host.state(), HostState::SceneError);
    assert!(matches!(host.error(), Some(HostError::SceneConstruct { .. })));
    assert!(host.graph().is_empty());

    FAIL_CONSTRUCT.with(|f| f.set(false));
    host.retry().unwrap();
    assert_eq!(host.state(), HostState::SceneActive);
    assert_eq!(host.graph().len(), 3);
}

#[test]
fn renderer_init_failure_stays_uninitialized_until_retry() {
    let surface = MockSurface::default();
    surface.0.borrow_mut().fail_init = true;
    let mut host = CanvasHost::new(surface.clone(), HostConfig::default()).with_resolver(recording_resolver);
    assert!(host.init().is_err());
    assert_eq!(host.state(), HostState::Uninitialized);
    assert!(host.error().is_some_and(|e| e.needs_new_surface()));

    host.select(FormulaId::OhmsLaw, 0);
    host.frame(0.016);
    assert_eq!(surface.0.borrow().draws, 0);
    assert!(host.active_formula().is_none());

    surface.0.borrow_mut().fail_init = false;
    host.retry().unwrap();
    assert_eq!(host.state(), HostState::SceneActive);
    assert_eq!(host.active_formula(), Some(FormulaId::OhmsLaw));
    assert_eq!(surface.0.borrow().inits, 2);
    assert_eq!(surface.0.borrow().releases, 1);
}

#[test]
fn lost_context_becomes_renderer_error() {
    let (mut host, surface) = recording_host();
    host.select(FormulaId::OhmsLaw, 0);
    surface.0.borrow_mut().fail_draw = true;
    host.frame(0.016);
    assert_eq!(host.state(), HostState::Uninitialized);
    assert!(matches!(host.error(), Some(HostError::Renderer(_))));
    assert!(host.graph().is_empty());

    surface.0.borrow_mut().fail_draw = false;
    host.retry().unwrap();
    host.frame(0.016);
    assert_eq!(host.state(), HostState::SceneActive);
}

#[test]
fn dispose_is_safe_in_every_state_and_runs_on_drop() {
    let (mut host, surface) = recording_host();
    host.select(FormulaId::OhmsLaw, 0);
    host.dispose();
    host.dispose();
    assert_eq!(host.state(), HostState::Disposed);
    assert_eq!(surface.0.borrow().releases, 1);
    assert_eq!(take_events().iter().filter(|e| e.starts_with("destroy")).count(), 1);

    host.select(FormulaId::NewtonSecondLaw, 0);
    host.frame(0.016);
    assert!(host.active_formula().is_none());

    let surface = MockSurface::default();
    {
        let mut host = CanvasHost::new(surface.clone(), HostConfig::default()).with_resolver(recording_resolver);
        host.init().unwrap();
        host.select(FormulaId::HookesLaw, 0);
        take_events();
    }
    assert_eq!(take_events(), vec!["destroy hookes-law"]);
    assert_eq!(surface.0.borrow().releases, 1);
}

#[test]
fn scene_destroy_twice_is_harmless() {
    for id in FormulaId::ALL {
        let Some(construct) = wobble_core::scene::resolve(id) else {
            continue;
        };
        let mut graph = SceneGraph::new();
        let mut scene = construct(&mut graph, formulas::get(id)).unwrap();
        assert!(graph.len() > 1);
        scene.destroy(&mut graph);
        assert!(graph.is_empty(), "{} leaked nodes", id);
        scene.destroy(&mut graph);
        assert!(scene.container().is_none());
        let store = ValueStore::new(id);
        assert!(scene.update(&mut graph, store.record()).is_ok());
        scene.tick(&mut graph, 0.016);
        assert!(graph.is_empty());
    }
}

#[test]
fn pause_freezes_animation_and_resume_continues() {
    let mut host = CanvasHost::new(MockSurface::default(), HostConfig::default());
    host.init().unwrap();
    let store = ValueStore::new(FormulaId::WaveSpeed);
    host.select(FormulaId::WaveSpeed, store.epoch());
    host.update(store.record());
    host.frame(0.05);

    let snapshot = |host: &CanvasHost<MockSurface>| {
        let graph = host.graph();
        let container = graph.children(graph.root())[0];
        let bob = graph.children(container)[2];
        graph.get(bob).map(|n| n.transform.position)
    };

    host.set_paused(true);
    let before = snapshot(&host);
    let clock = host.clock();
    for _ in 0..10 {
        host.frame(0.05);
    }
    assert_eq!(snapshot(&host), before);
    assert_eq!(host.clock(), clock);
    assert_eq!(host.state(), HostState::SceneActive);

    host.set_paused(false);
    host.frame(0.05);
    assert_ne!(snapshot(&host), before);
    assert!(host.clock() > clock);
}

#[test]
fn long_frame_gaps_are_clamped() {
    let mut host = CanvasHost::new(MockSurface::default(), HostConfig::default());
    host.init().unwrap();
    host.frame(10.0);
    host.frame(f32::NAN);
    host.frame(-1.0);
    assert!((host.clock() - wobble_core::MAX_FRAME_DT_SEC).abs() < 1e-6);
}

#[test]
fn real_scenes_receive_records_through_the_host() {
    let mut host = CanvasHost::new(MockSurface::default(), HostConfig::default());
    host.init().unwrap();
    let mut store = ValueStore::new(FormulaId::ProjectileRange);
    for id in FormulaId::ALL {
        store.select(id);
        host.select(id, store.epoch());
        host.update(store.record());
        for _ in 0..5 {
            host.frame(0.02);
        }
        let expected = if wobble_core::scene::resolve(id).is_some() {
            HostState::SceneActive
        } else {
            HostState::Ready
        };
        assert_eq!(host.state(), expected, "{}", id);
        assert!(host.error().is_none());
        assert!(host.graph().children(host.graph().root()).len() <= 1);
    }
}

#[test]
fn records_from_an_earlier_visit_are_dropped_after_switching_back() {
    let (mut host, _surface) = recording_host();
    let mut store = ValueStore::new(FormulaId::NewtonSecondLaw);
    store.select(FormulaId::OhmsLaw);
    host.select(FormulaId::OhmsLaw, store.epoch());
    let first_visit = store.record().clone();
    host.update(&first_visit);

    store.select(FormulaId::NewtonSecondLaw);
    host.select(FormulaId::NewtonSecondLaw, store.epoch());
    store.select(FormulaId::OhmsLaw);
    host.select(FormulaId::OhmsLaw, store.epoch());
    take_events();

    host.update(&first_visit);
    assert!(take_events().is_empty());

    host.update(store.record());
    assert_eq!(
        take_events(),
        vec![format!("update ohms-law epoch={}", store.epoch())]
    );
}
