// Tractyl Integration Tests
//
// These tests drive the public API across module boundaries:
// config store -> DPI controller -> motion engine -> sticky keys -> split sync
//
// Run with: cargo test -p tractyl-core --test integration_test

mod tests {
    use tractyl_core::config::{ConfigStore, MemoryStorage, PointerConfig, Tunables, CONFIG_KEY};
    use tractyl_core::dpi::{self, DpiCurve};
    use tractyl_core::keycode::{KC_DOWN, KC_LEFT, KC_RIGHT, KC_UP};
    use tractyl_core::pointer::{MotionEngine, MotionSample};
    use tractyl_core::sticky::{DanceState, StickyArbiter, StickyRole};
    use tractyl_core::sync::{handle_sync, RecordingLink, SyncBridge};
    use tractyl_core::{ModeFlag, ModMask, OutputEvent, RecordingOutput};

    const MODE_FLAGS: [ModeFlag; 6] = [
        ModeFlag::Sniping,
        ModeFlag::DragScroll,
        ModeFlag::Caret,
        ModeFlag::Custom,
        ModeFlag::ModeSelect,
        ModeFlag::Integration,
    ];

    fn apply(config: &mut PointerConfig, flag: ModeFlag, enable: bool) {
        match flag {
            ModeFlag::Sniping => config.set_sniping(enable),
            ModeFlag::DragScroll => config.set_dragscroll(enable),
            ModeFlag::Caret => config.set_caret(enable),
            ModeFlag::Custom => config.set_custom(enable),
            ModeFlag::ModeSelect => config.set_mode_select(enable),
            ModeFlag::Integration => config.set_integration(enable),
        }
    }

    // =========================================================================
    // Config invariants
    // =========================================================================

    #[test]
    fn test_nonstacking_invariant_over_toggle_sequences() {
        let ops: Vec<(ModeFlag, bool)> = MODE_FLAGS
            .iter()
            .flat_map(|f| [(*f, true), (*f, false)])
            .collect();

        for a in &ops {
            for b in &ops {
                for c in &ops {
                    for d in &ops {
                        let mut config = PointerConfig::new();
                        for (flag, enable) in [a, b, c, d] {
                            apply(&mut config, *flag, *enable);
                            assert!(
                                config.nonstacking_count() <= 1,
                                "sequence {:?} {:?} {:?} {:?} broke the invariant",
                                a, b, c, d
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_last_enabled_mode_wins() {
        let mut config = PointerConfig::new();
        config.set_caret(true);
        config.set_sniping(true);
        config.set_custom(true);
        assert!(config.is_custom());
        assert!(!config.is_caret());
        assert!(config.is_sniping());
    }

    #[test]
    fn test_save_load_clears_transient_flags() {
        let mut store = ConfigStore::new(MemoryStorage::new());
        let mut config = store.load();
        config.set_mode_select(true);
        config.set_sniping(true);
        config.set_integration(true);
        config.step_default_dpi(true);
        config.step_sniping_dpi(false);
        store.save(&config);

        // Stored verbatim
        assert_eq!(store.storage().record(CONFIG_KEY), Some(&config.to_bytes()[..]));

        store.save(&store.load());
        let reloaded = store.load();
        assert!(!reloaded.is_mode_select());
        assert!(!reloaded.is_sniping());
        assert!(!reloaded.is_integration());
        assert_eq!(reloaded.nonstacking_count(), 0);
        assert_eq!(reloaded.default_dpi_step(), 1);
        assert_eq!(reloaded.sniping_dpi_step(), 3);
    }

    #[test]
    fn test_storage_failure_keeps_memory_authoritative() {
        let mut storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        let mut store = ConfigStore::new(storage);

        let mut config = store.load();
        config.step_default_dpi(true);
        store.save(&config);

        assert_eq!(config.default_dpi_step(), 1);
        assert_eq!(store.load(), PointerConfig::default());
    }

    // =========================================================================
    // DPI
    // =========================================================================

    #[test]
    fn test_dpi_forward_then_backward_restores() {
        let tunables = Tunables::default();
        for curve in [DpiCurve::Default, DpiCurve::Sniping] {
            for n in 0..40 {
                let mut config = PointerConfig::new();
                let start = dpi::effective_dpi(&config, &tunables.dpi, curve);
                for _ in 0..n {
                    dpi::step(&mut config, &tunables.dpi, curve, true);
                }
                for _ in 0..n {
                    dpi::step(&mut config, &tunables.dpi, curve, false);
                }
                assert_eq!(dpi::effective_dpi(&config, &tunables.dpi, curve), start);
            }
        }
    }

    #[test]
    fn test_sensor_dpi_priority() {
        let tunables = Tunables::default();
        let mut config = PointerConfig::new();
        config.step_default_dpi(true);
        assert_eq!(dpi::sensor_dpi(&config, &tunables.dpi), 600);

        config.set_sniping(true);
        assert_eq!(dpi::sensor_dpi(&config, &tunables.dpi), 200);

        config.set_dragscroll(true);
        assert_eq!(dpi::sensor_dpi(&config, &tunables.dpi), 100);
    }

    // =========================================================================
    // Motion
    // =========================================================================

    #[test]
    fn test_dragscroll_exact_single_scroll() {
        let tunables = Tunables::default();
        let threshold = tunables.motion.dragscroll_buffer;
        let mut engine = MotionEngine::new();
        let mut config = PointerConfig::new();
        config.set_dragscroll(true);
        let mut out = RecordingOutput::new();

        let mut scrolls = Vec::new();
        for _ in 0..threshold + 1 {
            let report = engine.process(&mut config, &tunables, MotionSample::new(1, 0), &mut out);
            assert_eq!((report.x, report.y), (0, 0));
            if report.h != 0 || report.v != 0 {
                scrolls.push((report.h, report.v));
            }
        }
        assert_eq!(scrolls, vec![(1, 0)]);
        assert_eq!(engine.scroll_buffer().x, 0);
    }

    #[test]
    fn test_caret_eleven_counts_one_tap() {
        let tunables = Tunables::default();
        assert_eq!(tunables.motion.caret_buffer, 40);
        let mut engine = MotionEngine::new();
        let mut config = PointerConfig::new();
        config.set_caret(true);
        let mut out = RecordingOutput::new();

        let report = engine.process(&mut config, &tunables, MotionSample::new(11, 0), &mut out);
        assert!(report.is_empty());
        assert_eq!(out.events(), &[OutputEvent::Tap(KC_RIGHT)]);
        assert!(engine.tap_buffer().is_empty());
    }

    #[test]
    fn test_caret_all_directions() {
        let tunables = Tunables::default();
        let mut engine = MotionEngine::new();
        let mut config = PointerConfig::new();
        config.set_caret(true);
        let mut out = RecordingOutput::new();

        for (dx, dy) in [(10, 0), (-10, 0), (0, 10), (0, -10)] {
            engine.process(&mut config, &tunables, MotionSample::new(dx, dy), &mut out);
        }
        assert_eq!(out.taps(), vec![KC_RIGHT, KC_LEFT, KC_UP, KC_DOWN]);
    }

    #[test]
    fn test_mode_select_walkthrough() {
        let tunables = Tunables::default();
        let mut engine = MotionEngine::new();
        let mut config = PointerConfig::new();
        let mut out = RecordingOutput::new();

        config.set_mode_select(true);
        // down: integration on, still selecting
        engine.process(&mut config, &tunables, MotionSample::new(0, 40), &mut out);
        assert!(config.is_integration());
        assert!(config.is_mode_select());

        // up: everything off; the integrator restarted when integration
        // came on, so this push alone crosses the threshold
        engine.process(&mut config, &tunables, MotionSample::new(0, -40), &mut out);
        assert!(!config.is_mode_select());
        assert!(!config.is_integration());
        assert!(out.events().is_empty());
    }

    // =========================================================================
    // Sticky keys
    // =========================================================================

    #[test]
    fn test_hold_shift_then_unstick_twice() {
        let mut arbiter = StickyArbiter::new(Tunables::default().sticky);
        let mut config = PointerConfig::new();
        let mut out = RecordingOutput::new();

        arbiter.finished(StickyRole::Shift, &DanceState::hold(), 0, &mut config, &mut out);
        assert!(arbiter.is_active(StickyRole::Shift));
        assert!(out.registered_mods().contains(ModMask::LSFT));

        arbiter.unstick_keys(&mut config, &mut out);
        assert!(!arbiter.is_active(StickyRole::Shift));
        assert!(!out.registered_mods().contains(ModMask::LSFT));

        let before = out.events().len();
        arbiter.unstick_keys(&mut config, &mut out);
        assert_eq!(out.events().len(), before);
    }

    #[test]
    fn test_active_implies_registered() {
        let tunables = Tunables::default();
        let mut arbiter = StickyArbiter::new(tunables.sticky);
        let mut config = PointerConfig::new();
        let mut out = RecordingOutput::new();

        for role in [StickyRole::Alt, StickyRole::Gui, StickyRole::Raise] {
            arbiter.finished(role, &DanceState::tap(), 0, &mut config, &mut out);
        }
        arbiter.activate_stkeys(&mut config, &mut out);

        assert!(arbiter.is_active(StickyRole::Alt));
        assert!(arbiter.is_active(StickyRole::Gui));
        assert!(arbiter.is_active(StickyRole::Raise));
        assert_eq!(out.registered_mods(), ModMask::LALT | ModMask::LGUI);
        assert!(out.is_layer_on(tunables.sticky.raise_layer));
        assert!(!arbiter.is_active(StickyRole::Shift));
    }

    // =========================================================================
    // Split sync
    // =========================================================================

    #[test]
    fn test_sync_dedup_and_mirror() {
        let mut bridge = SyncBridge::new(Tunables::default().sync.interval_ms);
        let mut link = RecordingLink::new();
        let mut config = PointerConfig::new();
        config.set_sniping(true);

        bridge.housekeeping(100, &config, &mut link);
        bridge.housekeeping(300, &config, &mut link);
        assert_eq!(link.send_count(), 1);

        let (_, payload) = &link.sent()[0];
        assert_eq!(handle_sync(payload), Some(config));
    }
}
