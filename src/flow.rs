//! Flow control and the fixed-tick frame loop.
//!
//! A "flow" represents a scene or game state that updates itself and queues
//! what it wants drawn each frame. [`run`] drives any number of flows that
//! share one state value `S` and one [`Context`].
//!
//! # User-facing types
//!
//! - [`GraphicsFlow<S, D>`] is the trait for scenes/states
//! - [`Out<S, D>`] is what a lifecycle hook hands back to the loop
//! - [`FixedTick`] is the gate deciding when the next pass may run
//!
//! # Lifecycle Flow
//!
//! After `on_init` has run for every flow, each pass does:
//! 1. Wait for the tick gate to open
//! 2. Call `on_update` on all flows with the elapsed time
//! 3. Call `on_render` on all flows to fill the render queue
//! 4. Render the queue and present the frame
//!
//! The loop ends as soon as a hook returns [`Out::Exit`].

use instant::{Duration, Instant};

use crate::{context::Context, drawer::Drawer, renderer::Renderer3D};

///
/// This is the Output Type for every lifecycle hook.
///
/// `Out::Configure` can be used to modify the Context during runtime for instance to change the tick
/// speed or the clear colour.
///
/// `Out::Mutate` applies a change to the shared state once the hook has returned.
///
/// `Out::Exit` stops the loop after the current hook round.
///
/// `Empty` is the default output used when nothing needs to be handled.
///
pub enum Out<S, D: Drawer> {
    Configure(Box<dyn FnOnce(&mut Context<D>)>),
    Mutate(Box<dyn FnOnce(&mut S)>),
    Exit,
    Empty,
}

impl<S, D: Drawer> Default for Out<S, D> {
    fn default() -> Self {
        Self::Empty
    }
}

/// Trait for implementing a renderable scene or game state.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once before the first frame; configure the context (camera, clear colour, etc.)
/// 2. `on_update()` is called every pass of the loop
/// 3. `on_render()` is called every pass and queues what `self` draws
pub trait GraphicsFlow<S, D: Drawer> {
    /// Initialize the flow and configure the context.
    fn on_init(&mut self, ctx: &mut Context<D>, state: &mut S) -> Out<S, D>;

    /// Update state. `dt` is the wall-clock time since the previous pass.
    fn on_update(&mut self, ctx: &Context<D>, state: &mut S, dt: Duration) -> Out<S, D>;

    /// Queue this flow's objects for the current frame.
    fn on_render(&self, renderer: &mut Renderer3D<D>, state: &S) -> anyhow::Result<()>;
}

/// Fixed-tick gate.
///
/// A pass may run once `now` reaches the next deadline. Deadlines sit on a
/// grid of `period` steps from the gate's creation, so a late pass does not
/// shift later ones. Missed ticks are not made up: a pass that overruns
/// simply delays the next one to the following grid point.
#[derive(Clone, Debug)]
pub struct FixedTick {
    period: Duration,
    origin: Instant,
    last: Instant,
    next: Instant,
}

impl FixedTick {
    /// A gate that opens immediately and then every `period`.
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            origin: now,
            last: now,
            next: now,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    /// Returns the time since the last pass if a pass may run at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<Duration> {
        if now < self.next {
            return None;
        }
        let dt = now.saturating_duration_since(self.last);
        self.last = now;
        self.next = self.next_deadline(now);
        Some(dt)
    }

    /// Time left until the gate opens.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    fn next_deadline(&self, now: Instant) -> Instant {
        let period = self.period.as_nanos();
        if period == 0 {
            return now;
        }
        let elapsed = now.saturating_duration_since(self.origin).as_nanos();
        let steps = elapsed / period + 1;
        let offset = u64::try_from(steps * period).unwrap_or(u64::MAX);
        self.origin + Duration::from_nanos(offset)
    }
}

/// Applies a hook's output. Returns true if the loop should stop.
///
/// After `Out::Configure` the edited config is applied to the renderer again.
fn handle_flow_output<S, D: Drawer>(
    state: &mut S,
    ctx: &mut Context<D>,
    out: Out<S, D>,
) -> crate::error::Result<bool> {
    match out {
        Out::Configure(f) => {
            f(ctx);
            ctx.apply_config()?;
        }
        Out::Mutate(f) => f(state),
        Out::Exit => return Ok(true),
        Out::Empty => (),
    }
    Ok(false)
}

/// Runs `flows` until one of them returns [`Out::Exit`].
///
/// Returns the context and the final shared state.
pub fn run<S: Default, D: Drawer>(
    mut ctx: Context<D>,
    mut flows: Vec<Box<dyn GraphicsFlow<S, D>>>,
) -> anyhow::Result<(Context<D>, S)> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let mut state = S::default();
    let mut exit = false;
    for flow in flows.iter_mut() {
        let out = flow.on_init(&mut ctx, &mut state);
        exit |= handle_flow_output(&mut state, &mut ctx, out)?;
    }

    log::info!("Entering main loop with {} flows", flows.len());
    let mut tick = FixedTick::new(ctx.config.tick, Instant::now());
    while !exit {
        tick.set_period(ctx.config.tick);
        let now = Instant::now();
        let Some(dt) = tick.poll(now) else {
            std::thread::sleep(tick.remaining(now));
            continue;
        };

        for flow in flows.iter_mut() {
            let out = flow.on_update(&ctx, &mut state, dt);
            exit |= handle_flow_output(&mut state, &mut ctx, out)?;
        }
        if exit {
            break;
        }

        for flow in flows.iter() {
            flow.on_render(&mut ctx.renderer, &state)?;
        }
        ctx.renderer.render_frame();
        ctx.drawer_mut().present();
    }
    log::info!("Exiting main loop");

    Ok((ctx, state))
}
