// Tractyl Simulator CLI
// Replays a scripted session against a primary and a secondary half

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use tractyl_core::{
    Action, Command, DanceState, DpiCurve, HalfRole, KeyboardState, Keycode, MemoryStorage,
    MotionSample, RecordingLink, RecordingOutput, RecordingSensor, StickyRole, Tunables,
};

/// Host-side simulator for the tractyl input core
#[derive(Parser, Debug)]
#[command(name = "tractyl-sim")]
#[command(version)]
#[command(about = "Replay pointer and sticky-key scripts", long_about = None)]
struct Args {
    /// Script to replay
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// TOML tunables file (defaults to ~/.config/tractyl/tunables.toml if present)
    #[arg(short, long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the effective tunables as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

/// How a command key is actuated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Actuation {
    Press,
    Release,
    Tap,
}

/// What happens to a tap-dance key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DanceStep {
    Tap,
    Hold,
    Release,
}

/// One parsed script line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Motion(i16, i16),
    Cmd(Command, Actuation),
    Dance(StickyRole, DanceStep),
    Key(Keycode, Action),
    Tick(u32),
    Save,
    Reset,
    Show,
}

fn parse_action(word: &str) -> Result<Action> {
    match word {
        "press" => Ok(Action::Press),
        "release" => Ok(Action::Release),
        other => bail!("expected press|release, got {:?}", other),
    }
}

fn word<'a>(words: &[&'a str], i: usize) -> Result<&'a str> {
    words
        .get(i)
        .copied()
        .ok_or_else(|| anyhow!("{:?} needs {} argument(s)", words[0], i))
}

/// Parse one line; blank lines and `#` comments yield `None`
fn parse_line(line: &str) -> Result<Option<Step>> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    let arg = |i: usize| word(&words, i);

    let step = match words[0] {
        "motion" => Step::Motion(
            arg(1)?.parse().context("invalid dx")?,
            arg(2)?.parse().context("invalid dy")?,
        ),
        "cmd" => {
            let command = Command::from_str(arg(1)?)
                .map_err(|_| anyhow!("unknown command {:?}", words[1]))?;
            let actuation = match arg(2)? {
                "press" => Actuation::Press,
                "release" => Actuation::Release,
                "tap" => Actuation::Tap,
                other => bail!("expected press|release|tap, got {:?}", other),
            };
            Step::Cmd(command, actuation)
        }
        "dance" => {
            let role = StickyRole::from_str(arg(1)?)
                .map_err(|_| anyhow!("unknown sticky role {:?}", words[1]))?;
            let step = match arg(2)? {
                "tap" => DanceStep::Tap,
                "hold" => DanceStep::Hold,
                "release" => DanceStep::Release,
                other => bail!("expected tap|hold|release, got {:?}", other),
            };
            Step::Dance(role, step)
        }
        "key" => {
            let keycode =
                Keycode::from_str(arg(1)?).map_err(|_| anyhow!("unknown key {:?}", words[1]))?;
            Step::Key(keycode, parse_action(arg(2)?)?)
        }
        "tick" => Step::Tick(arg(1)?.parse().context("invalid tick duration")?),
        "save" => Step::Save,
        "reset" => Step::Reset,
        "show" => Step::Show,
        other => bail!("unknown statement {:?}", other),
    };
    Ok(Some(step))
}

/// Both halves of the keyboard joined by an in-process link
struct Simulator {
    primary: KeyboardState<MemoryStorage>,
    secondary: KeyboardState<MemoryStorage>,
    link: RecordingLink,
    /// The secondary never sends, but housekeeping needs a link
    idle_link: RecordingLink,
    out: RecordingOutput,
    sensor: RecordingSensor,
    remote_out: RecordingOutput,
    remote_sensor: RecordingSensor,
    now_ms: u32,
}

impl Simulator {
    fn new(tunables: Tunables) -> Self {
        let mut sim = Self {
            primary: KeyboardState::new(MemoryStorage::new(), tunables, HalfRole::Primary),
            secondary: KeyboardState::new(MemoryStorage::new(), tunables, HalfRole::Secondary),
            link: RecordingLink::new(),
            idle_link: RecordingLink::new(),
            out: RecordingOutput::new(),
            sensor: RecordingSensor::new(),
            remote_out: RecordingOutput::new(),
            remote_sensor: RecordingSensor::new(),
            now_ms: 0,
        };
        sim.primary.init(&mut sim.sensor);
        sim.secondary.init(&mut sim.remote_sensor);
        sim
    }

    fn run(&mut self, step: Step) {
        match step {
            Step::Motion(dx, dy) => {
                let report = self
                    .primary
                    .process_motion(MotionSample::new(dx, dy), &mut self.out, &mut self.sensor);
                if !report.is_empty() {
                    println!("  report {}", report);
                }
            }
            Step::Cmd(command, actuation) => {
                let actions: &[Action] = match actuation {
                    Actuation::Press => &[Action::Press],
                    Actuation::Release => &[Action::Release],
                    Actuation::Tap => &[Action::Press, Action::Release],
                };
                for action in actions {
                    self.primary
                        .process_command(command, *action, &self.out, &mut self.sensor);
                }
            }
            Step::Dance(role, DanceStep::Tap) => {
                let outcome = self
                    .primary
                    .dance_finished(role, &DanceState::tap(), &mut self.out, &mut self.sensor);
                println!("  {} resolved as {}", role, outcome);
            }
            Step::Dance(role, DanceStep::Hold) => {
                let outcome = self
                    .primary
                    .dance_finished(role, &DanceState::hold(), &mut self.out, &mut self.sensor);
                println!("  {} resolved as {}", role, outcome);
            }
            Step::Dance(role, DanceStep::Release) => {
                self.primary.dance_reset(role, &mut self.out, &mut self.sensor);
            }
            Step::Key(keycode, action) => {
                self.primary
                    .process_key(keycode, action, &mut self.out, &mut self.sensor);
                println!("  key {} {}", keycode.name(), action);
            }
            Step::Tick(ms) => self.tick(ms),
            Step::Save => {
                self.primary.save();
                println!("  config saved");
            }
            Step::Reset => {
                self.primary.reset_to_default(&mut self.sensor);
                println!("  config reset to defaults");
            }
            Step::Show => {
                show("primary", &self.primary);
                show("secondary", &self.secondary);
            }
        }
        self.flush();
    }

    /// Advance the clock, run housekeeping on both halves and deliver syncs
    fn tick(&mut self, ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(ms);
        self.primary
            .housekeeping(self.now_ms, &mut self.link, &mut self.out, &mut self.sensor);
        self.secondary.housekeeping(
            self.now_ms,
            &mut self.idle_link,
            &mut self.remote_out,
            &mut self.remote_sensor,
        );
        for (msg_id, payload) in self.link.take_sent() {
            let applied = self.secondary.receive_sync(&payload, &mut self.remote_sensor);
            println!(
                "  sync {:#04x} {} bytes -> secondary ({})",
                msg_id,
                payload.len(),
                if applied { "applied" } else { "dropped" }
            );
        }
    }

    fn flush(&mut self) {
        for event in self.out.take_events() {
            println!("  {}", event);
        }
        for event in self.remote_out.take_events() {
            println!("  secondary: {}", event);
        }
    }
}

fn show(label: &str, state: &KeyboardState<MemoryStorage>) {
    let config = state.config();
    println!(
        "  {}: mode={} sniping={} integration={} dpi={} (default {}, sniping {})",
        label,
        state.pointer_mode(),
        config.is_sniping(),
        config.is_integration(),
        state.sensor_dpi(),
        state.effective_dpi(DpiCurve::Default),
        state.effective_dpi(DpiCurve::Sniping),
    );
}

fn replay(path: &Path, sim: &mut Simulator) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))?;
    for (number, line) in content.lines().enumerate() {
        let step = parse_line(line).with_context(|| format!("{}:{}", path.display(), number + 1))?;
        if let Some(step) = step {
            println!("> {}", line.trim());
            sim.run(step);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct TunablesDump {
    dpi: DpiDump,
    motion: MotionDump,
    custom: CustomDump,
    sticky: StickyDump,
    sync: SyncDump,
}

#[derive(Serialize)]
struct DpiDump {
    min_default: u16,
    default_step: u16,
    min_sniping: u16,
    sniping_step: u16,
    dragscroll: u16,
}

#[derive(Serialize)]
struct MotionDump {
    dragscroll_buffer: i32,
    caret_buffer: i32,
    acceleration: bool,
    acceleration_factor: i32,
    integration_caret_scale: i32,
    integration_scroll_scale: i32,
    dragscroll_reverse_x: bool,
    dragscroll_reverse_y: bool,
    caret_reverse_x: bool,
    caret_reverse_y: bool,
}

#[derive(Serialize)]
struct CustomDump {
    right: String,
    left: String,
    up: String,
    down: String,
}

#[derive(Serialize)]
struct StickyDump {
    lower_layer: u8,
    raise_layer: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_ms: Option<u32>,
}

#[derive(Serialize)]
struct SyncDump {
    interval_ms: u32,
}

impl From<&Tunables> for TunablesDump {
    fn from(t: &Tunables) -> Self {
        let name = |k: Keycode| k.name().to_string();
        Self {
            dpi: DpiDump {
                min_default: t.dpi.min_default,
                default_step: t.dpi.default_step,
                min_sniping: t.dpi.min_sniping,
                sniping_step: t.dpi.sniping_step,
                dragscroll: t.dpi.dragscroll,
            },
            motion: MotionDump {
                dragscroll_buffer: t.motion.dragscroll_buffer,
                caret_buffer: t.motion.caret_buffer,
                acceleration: t.motion.acceleration,
                acceleration_factor: t.motion.acceleration_factor,
                integration_caret_scale: t.motion.integration_caret_scale,
                integration_scroll_scale: t.motion.integration_scroll_scale,
                dragscroll_reverse_x: t.motion.dragscroll_reverse_x,
                dragscroll_reverse_y: t.motion.dragscroll_reverse_y,
                caret_reverse_x: t.motion.caret_reverse_x,
                caret_reverse_y: t.motion.caret_reverse_y,
            },
            custom: CustomDump {
                right: name(t.custom.right),
                left: name(t.custom.left),
                up: name(t.custom.up),
                down: name(t.custom.down),
            },
            sticky: StickyDump {
                lower_layer: t.sticky.lower_layer.index(),
                raise_layer: t.sticky.raise_layer.index(),
                timeout_ms: t.sticky.timeout_ms,
            },
            sync: SyncDump {
                interval_ms: t.sync.interval_ms,
            },
        }
    }
}

fn load_tunables(args: &Args) -> Result<Tunables> {
    match &args.config {
        Some(path) => Tunables::from_toml_path(path)
            .with_context(|| format!("loading tunables from {}", path.display())),
        None => Tunables::load_default().context("loading default tunables"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let tunables = load_tunables(&args)?;

    if args.dump_config {
        let dump = toml::to_string_pretty(&TunablesDump::from(&tunables))
            .context("serializing tunables")?;
        print!("{}", dump);
        return Ok(());
    }

    let script = args
        .script
        .as_deref()
        .ok_or_else(|| anyhow!("a SCRIPT is required unless --dump-config is given"))?;

    log::info!("replaying {}", script.display());
    let mut sim = Simulator::new(tunables);
    replay(script, &mut sim)
}
