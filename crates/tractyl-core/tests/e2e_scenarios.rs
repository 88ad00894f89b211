// Tractyl End-to-End Test Scenarios
//
// These tests replay complete user workflows against a primary and a
// secondary half joined by a recording link, without any hardware.
//
// Run with: cargo test -p tractyl-core --test e2e_scenarios

mod e2e_tests {
    use tractyl_core::keycode::{KC_A, KC_ESCAPE, KC_RIGHT};
    use tractyl_core::{
        Action, Command, DanceState, DpiCurve, HalfRole, KeyboardState, MemoryStorage, ModMask,
        MotionSample, MouseReport, OutputEvent, PointerMode, RecordingLink, RecordingOutput,
        RecordingSensor, StickyRole, Tunables,
    };

    // =========================================================================
    // Test Helpers
    // =========================================================================

    struct Split {
        primary: KeyboardState<MemoryStorage>,
        secondary: KeyboardState<MemoryStorage>,
        link: RecordingLink,
        out: RecordingOutput,
        sensor: RecordingSensor,
        remote_out: RecordingOutput,
        remote_sensor: RecordingSensor,
    }

    impl Split {
        fn new() -> Self {
            Self::with_tunables(Tunables::default())
        }

        fn with_tunables(tunables: Tunables) -> Self {
            let mut split = Split {
                primary: KeyboardState::new(MemoryStorage::new(), tunables, HalfRole::Primary),
                secondary: KeyboardState::new(MemoryStorage::new(), tunables, HalfRole::Secondary),
                link: RecordingLink::new(),
                out: RecordingOutput::new(),
                sensor: RecordingSensor::new(),
                remote_out: RecordingOutput::new(),
                remote_sensor: RecordingSensor::new(),
            };
            split.primary.init(&mut split.sensor);
            split.secondary.init(&mut split.remote_sensor);
            split
        }

        /// Tap a command key on the primary
        fn command(&mut self, command: Command) {
            self.primary
                .process_command(command, Action::Press, &self.out, &mut self.sensor);
            self.primary
                .process_command(command, Action::Release, &self.out, &mut self.sensor);
        }

        fn motion(&mut self, dx: i16, dy: i16) -> MouseReport {
            self.primary
                .process_motion(MotionSample::new(dx, dy), &mut self.out, &mut self.sensor)
        }

        fn tap_dance(&mut self, role: StickyRole) {
            self.primary
                .dance_finished(role, &DanceState::tap(), &mut self.out, &mut self.sensor);
            self.primary.dance_reset(role, &mut self.out, &mut self.sensor);
        }

        fn tap_key(&mut self, keycode: tractyl_core::Keycode) {
            self.primary
                .process_key(keycode, Action::Press, &mut self.out, &mut self.sensor);
            self.primary
                .process_key(keycode, Action::Release, &mut self.out, &mut self.sensor);
        }

        /// Housekeeping on both halves, then deliver whatever was sent
        fn tick(&mut self, now_ms: u32) {
            self.primary
                .housekeeping(now_ms, &mut self.link, &mut self.out, &mut self.sensor);
            let mut unused = RecordingLink::new();
            self.secondary.housekeeping(
                now_ms,
                &mut unused,
                &mut self.remote_out,
                &mut self.remote_sensor,
            );
            for (_, payload) in self.link.take_sent() {
                self.secondary.receive_sync(&payload, &mut self.remote_sensor);
            }
        }
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    #[test]
    fn test_scenario_dpi_cycle_mirrors_and_persists() {
        let mut split = Split::new();
        split.tick(0);
        assert_eq!(split.remote_sensor.cpi(), Some(400));

        split.command(Command::DefaultDpiForward);
        split.command(Command::DefaultDpiForward);
        assert_eq!(split.sensor.cpi(), Some(800));

        split.tick(10);
        assert_eq!(split.secondary.config(), split.primary.config());
        assert_eq!(split.remote_sensor.cpi(), Some(800));

        // Persisted on the primary only
        assert_eq!(split.primary.store().storage().write_count(), 2);
        assert_eq!(split.secondary.store().storage().write_count(), 0);
    }

    #[test]
    fn test_scenario_keepalive_interval() {
        let mut split = Split::new();
        split.tick(0);
        split.tick(200);
        split.tick(500);
        split.tick(501);
        split.tick(700);
        // 0 (first), 501 (interval elapsed)
        assert_eq!(split.secondary.config(), split.primary.config());
        assert_eq!(split.remote_sensor.writes().len(), 1 + 2);
    }

    #[test]
    fn test_scenario_dragscroll_session() {
        let mut split = Split::new();
        split.command(Command::DragscrollModeToggle);
        assert_eq!(split.primary.pointer_mode(), PointerMode::DragScroll);
        assert_eq!(split.sensor.cpi(), Some(100));

        let mut v_total = 0i32;
        for _ in 0..21 {
            let report = split.motion(0, 1);
            assert_eq!((report.x, report.y), (0, 0));
            v_total += report.v as i32;
        }
        assert_eq!(v_total, 3);

        split.command(Command::DragscrollModeToggle);
        assert_eq!(split.primary.pointer_mode(), PointerMode::Pointing);
        let report = split.motion(5, -3);
        assert_eq!((report.x, report.y), (5, -3));
    }

    #[test]
    fn test_scenario_caret_navigation() {
        let mut split = Split::new();
        split.command(Command::CaretModeToggle);
        for _ in 0..4 {
            split.motion(5, 0);
        }
        assert_eq!(split.out.taps(), vec![KC_RIGHT, KC_RIGHT]);
    }

    #[test]
    fn test_scenario_mode_select_to_caret_then_reset() {
        let mut split = Split::new();
        split.command(Command::ModeSelectToggle);
        split.motion(-40, 0);
        assert_eq!(split.primary.pointer_mode(), PointerMode::Caret);

        split.command(Command::ModeSelectToggle);
        split.motion(0, -40);
        assert_eq!(split.primary.pointer_mode(), PointerMode::Pointing);
    }

    #[test]
    fn test_scenario_sticky_shift_one_shot() {
        let mut split = Split::new();
        split.tap_dance(StickyRole::Shift);
        assert!(split.out.events().is_empty());

        split.tap_key(KC_A);
        assert_eq!(
            split.out.events(),
            &[
                OutputEvent::RegisterMods(ModMask::LSFT),
                OutputEvent::UnregisterMods(ModMask::LSFT),
            ]
        );

        // Second key is unmodified
        split.out.clear();
        split.tap_key(KC_A);
        assert!(split.out.events().is_empty());
    }

    #[test]
    fn test_scenario_lower_hold_snipes() {
        let mut split = Split::new();
        split.primary.dance_finished(
            StickyRole::Lower,
            &DanceState::hold(),
            &mut split.out,
            &mut split.sensor,
        );
        assert!(split.primary.config().is_sniping());
        assert_eq!(split.sensor.cpi(), Some(split.primary.effective_dpi(DpiCurve::Sniping)));

        split.tick(50);
        assert!(split.secondary.config().is_sniping());

        split.primary.dance_reset(StickyRole::Lower, &mut split.out, &mut split.sensor);
        split.tick(60);
        assert!(!split.secondary.config().is_sniping());
        assert!(split.out.active_layers().is_empty());
    }

    #[test]
    fn test_scenario_escape_leaves_pointer_modes() {
        let mut split = Split::new();
        split.command(Command::SnipingModeToggle);
        split.command(Command::DragscrollModeToggle);
        split.tap_dance(StickyRole::Escape);

        assert_eq!(split.out.taps(), vec![KC_ESCAPE]);
        assert!(!split.primary.config().is_sniping());
        assert!(!split.primary.config().is_dragscroll());
        assert_eq!(split.sensor.cpi(), Some(400));
    }

    #[test]
    fn test_scenario_sticky_timeout() {
        let mut tunables = Tunables::default();
        tunables.sticky.timeout_ms = Some(500);
        let mut split = Split::with_tunables(tunables);

        split.tick(1000);
        split.tap_dance(StickyRole::Raise);
        assert!(split.out.is_layer_on(tunables.sticky.raise_layer));

        split.tick(1400);
        assert!(split.primary.sticky().is_armed());
        split.tick(1500);
        assert!(!split.primary.sticky().is_armed());
        assert!(!split.out.is_layer_on(tunables.sticky.raise_layer));

        // The expired one-shot no longer applies
        split.tap_key(KC_A);
        assert!(!split.out.is_layer_on(tunables.sticky.raise_layer));
    }

    #[test]
    fn test_scenario_reboot_keeps_dpi_only() {
        let mut split = Split::new();
        split.command(Command::SnipingDpiForward);
        split.command(Command::CaretModeToggle);
        split.primary.save();

        let storage = split.primary.store().storage().clone();
        let rebooted = KeyboardState::new(storage, Tunables::default(), HalfRole::Primary);
        assert_eq!(rebooted.config().sniping_dpi_step(), 1);
        assert_eq!(rebooted.pointer_mode(), PointerMode::Pointing);
    }
}
