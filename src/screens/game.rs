//! The game screen: one level session plus its HUD

use glam::Vec2;

use super::{BUTTON, TEXT};
use crate::app::AppContext;
use crate::consts::*;
use crate::draw::{DrawCmd, DrawList};
use crate::input::{InputEvent, Key, Propagation};
use crate::level::{LevelDescriptor, LevelKind};
use crate::sim::{
    FrameInput, GamePhase, Intro, LevelSession, Outcome, PigState, SessionOptions,
    slingshot_anchor,
};
use crate::ui::Button;
use crate::view::{Cx, Destination, Layer};

const SKY: &str = "#9BD4F5";
const GROUND: &str = "#4E8A2E";
const BAND: &str = "#5A3A1A";

/// What the last attempt earned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WinInfo {
    /// Won with the first bird
    pub star: bool,
    /// Next standard level, if any
    pub next: Option<LevelDescriptor>,
    /// Just won the last standard level
    pub beat_game: bool,
}

pub struct GameLayer {
    session: Option<LevelSession>,
    win: Option<WinInfo>,
    pause: Button,
    retry: Button,
    next: Button,
}

impl GameLayer {
    pub fn new() -> Self {
        Self {
            session: None,
            win: None,
            pause: Button::circle("II", Vec2::new(760.0, 40.0), 25.0),
            retry: Button::circle("R", Vec2::new(700.0, 40.0), 25.0),
            next: Button::rect("Next", Vec2::new(320.0, 340.0), Vec2::new(160.0, 56.0)),
        }
    }

    /// The running session
    pub fn session(&self) -> &LevelSession {
        match &self.session {
            Some(session) => session,
            None => panic!("no level loaded"),
        }
    }

    fn session_mut(&mut self) -> &mut LevelSession {
        match &mut self.session {
            Some(session) => session,
            None => panic!("no level loaded"),
        }
    }

    pub fn win(&self) -> Option<WinInfo> {
        self.win
    }

    fn start(&mut self, desc: LevelDescriptor, intro: Intro, ctx: &AppContext) {
        let level = ctx.levels.load_level(desc);
        let options = SessionOptions {
            viewport: ctx.viewport,
            bird_density: ctx.bird_density(),
            intro,
        };
        self.session = Some(LevelSession::new(level, ctx.new_world(), options));
        self.win = None;
    }

    /// Start over without the timed look at the level
    fn retry(&mut self, ctx: &AppContext) {
        let session = self.session();
        let desc = session.level.desc;
        let from = session.camera.pan();
        log::info!("Retry {:?} {}", desc.kind, desc.number);
        self.start(desc, Intro::Return { from }, ctx);
    }

    fn record(&mut self, outcome: Outcome, ctx: &mut AppContext) {
        let Outcome::Won { first_bird } = outcome else {
            return;
        };
        let desc = self.session().level.desc;
        self.win = Some(match desc.kind {
            LevelKind::Standard => {
                let next = ctx.levels.set_level_won(desc, first_bird);
                WinInfo {
                    star: first_bird,
                    next,
                    beat_game: next.is_none(),
                }
            }
            LevelKind::Custom => WinInfo {
                star: first_bird,
                ..Default::default()
            },
        });
    }

    fn next_level(&mut self, cx: &mut Cx) {
        let desc = self.session().level.desc;
        match self.win.and_then(|w| w.next) {
            Some(next) if desc.kind == LevelKind::Standard => {
                cx.reset_top(Destination::Game(next))
            }
            _ => cx.pop(),
        }
    }

    fn draw_session(&self, session: &LevelSession, ctx: &AppContext, out: &mut DrawList) {
        let cam = &session.camera;
        let world = session.world();

        out.rect(Vec2::ZERO, ctx.viewport, SKY);
        let ground = cam.to_screen(Vec2::ZERO).y;
        out.rect(
            Vec2::new(0.0, ground),
            Vec2::new(ctx.viewport.x, GROUND_THICKNESS),
            GROUND,
        );
        let anchor = cam.to_screen(slingshot_anchor());
        out.sprite("slingshot", anchor, Vec2::new(40.0, 100.0), 0.0);

        for block in &session.blocks {
            if let Some(pose) = world.pose(block.handle) {
                let center = cam.to_screen(pose.position);
                out.push(DrawCmd::Rect {
                    min: center - block.size / 2.0,
                    size: block.size,
                    color: block.kind.color(),
                    angle: -pose.angle,
                });
            }
        }

        for pig in session.alive_pigs() {
            if let Some(pose) = world.pose(pig.handle) {
                let name = match pig.state {
                    PigState::Squished => "pig_squished",
                    _ => "pig",
                };
                let size = Vec2::splat(PIG_RADIUS * 2.0);
                out.sprite(name, cam.to_screen(pose.position), size, -pose.angle);
            }
        }

        let bird_size = Vec2::splat(BIRD_RADIUS * 2.0);
        for bird in session.birds.iter().filter(|b| b.fired) {
            if let Some(pose) = bird.handle.and_then(|h| world.pose(h)) {
                out.sprite("bird", cam.to_screen(pose.position), bird_size, -pose.angle);
            }
        }
        if session.loaded_bird().is_some() {
            let pull = session.pull().unwrap_or(Vec2::ZERO);
            let at = cam.to_screen(slingshot_anchor() - pull);
            if pull != Vec2::ZERO {
                out.line(anchor, at, 6.0, BAND);
            }
            out.sprite("bird", at, bird_size, 0.0);
        }
        for i in 0..session.queued_birds() {
            let x = SLINGSHOT_X - (i + 1) as f32 * BIRD_QUEUE_SPACING;
            let at = cam.to_screen(Vec2::new(x, BIRD_RADIUS));
            out.sprite("bird", at, bird_size, 0.0);
        }

        for poof in &session.poofs {
            let age = ((ctx.now_ms - poof.started_ms) / POOF_MS) as f32;
            let size = Vec2::splat(PIG_RADIUS * 2.0 * (1.0 + age));
            out.sprite("poof", cam.to_screen(poof.position), size, 0.0);
        }
    }

    fn draw_hud(&self, session: &LevelSession, ctx: &AppContext, out: &mut DrawList) {
        self.pause.draw(out, BUTTON);
        self.retry.draw(out, BUTTON);

        let mid = ctx.viewport / 2.0;
        if session.paused {
            out.overlay("#000000", 0.5);
            out.text(mid, "Paused", 48.0, TEXT);
        }
        match (session.phase, self.win) {
            (GamePhase::Won, Some(win)) => {
                out.overlay("#000000", 0.4);
                let title = if win.beat_game {
                    "You beat the game!"
                } else {
                    "Level complete"
                };
                out.text(mid - Vec2::new(0.0, 80.0), title, 48.0, TEXT);
                if win.star {
                    out.sprite("star", mid - Vec2::new(0.0, 20.0), Vec2::splat(48.0), 0.0);
                }
                self.next.draw(out, BUTTON);
            }
            (GamePhase::Lost, _) => {
                out.overlay("#000000", 0.4);
                out.text(mid - Vec2::new(0.0, 80.0), "Out of birds", 48.0, TEXT);
            }
            _ => {}
        }
    }
}

impl Default for GameLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer for GameLayer {
    fn on_show(&mut self, dest: &Destination, cx: &mut Cx) {
        if let Destination::Game(desc) = *dest {
            self.start(desc, Intro::TimedCheck, cx.ctx);
        }
    }

    fn update(&mut self, cx: &mut Cx) {
        let session = self.session_mut();
        let input = FrameInput {
            pan: cx.ctx.keys.pan(cx.ctx.settings.pan_speed),
            cursor: Some(session.camera.to_world(cx.ctx.pointer)),
        };
        if let Some(outcome) = session.update(cx.ctx.now_ms, input) {
            self.record(outcome, cx.ctx);
        }
    }

    fn draw(&self, ctx: &AppContext, out: &mut DrawList) {
        let session = self.session();
        self.draw_session(session, ctx, out);
        self.draw_hud(session, ctx, out);
    }

    fn handle_event(&mut self, event: &InputEvent, cx: &mut Cx) -> Propagation {
        match *event {
            InputEvent::KeyDown(Key::Pause) => self.session_mut().toggle_pause(),
            InputEvent::KeyDown(Key::Retry) => self.retry(cx.ctx),
            InputEvent::KeyDown(Key::NextBird) => {
                self.session_mut().next_bird();
            }
            InputEvent::PointerDown(pos) if self.pause.hit(pos) => {
                self.session_mut().toggle_pause()
            }
            InputEvent::PointerDown(pos) if self.retry.hit(pos) => self.retry(cx.ctx),
            InputEvent::PointerDown(pos)
                if self.session().phase == GamePhase::Won && self.next.hit(pos) =>
            {
                self.next_level(cx)
            }
            InputEvent::PointerDown(pos) => {
                let session = self.session_mut();
                let world = session.camera.to_world(pos);
                if !session.pointer_down(world) {
                    return Propagation::Continue;
                }
            }
            InputEvent::PointerUp(pos) => {
                let session = self.session_mut();
                let world = session.camera.to_world(pos);
                if !session.pointer_up(world) {
                    return Propagation::Continue;
                }
            }
            _ => return Propagation::Continue,
        }
        Propagation::Stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::testing::KinematicWorld;
    use crate::persistence::MemoryStore;
    use crate::view::NavRequest;

    #[test]
    #[should_panic(expected = "no level loaded")]
    fn test_session_before_show_panics() {
        GameLayer::new().session();
    }

    fn ctx() -> AppContext {
        AppContext::new(
            Box::new(MemoryStore::new()),
            Box::new(|| Box::new(KinematicWorld::new())),
        )
    }

    fn shown(ctx: &mut AppContext, desc: LevelDescriptor) -> GameLayer {
        let mut game = GameLayer::new();
        let mut requests = Vec::new();
        game.on_show(&Destination::Game(desc), &mut Cx::new(ctx, &mut requests));
        game
    }

    fn send(game: &mut GameLayer, ctx: &mut AppContext, event: InputEvent) -> Vec<NavRequest> {
        let mut requests = Vec::new();
        game.handle_event(&event, &mut Cx::new(ctx, &mut requests));
        requests
    }

    #[test]
    fn test_show_loads_level_with_timed_check() {
        let mut ctx = ctx();
        let game = shown(&mut ctx, LevelDescriptor::standard(1));
        let session = game.session();
        assert_eq!(session.level.desc, LevelDescriptor::standard(1));
        assert_eq!(session.phase, GamePhase::Aiming);
        assert!(session.camera.pan() > 0.0);
    }

    #[test]
    fn test_retry_key_resets_session() {
        let mut ctx = ctx();
        let mut game = shown(&mut ctx, LevelDescriptor::standard(1));
        let anchor = game.session().camera.to_screen(slingshot_anchor());
        send(&mut game, &mut ctx, InputEvent::PointerDown(anchor));
        send(&mut game, &mut ctx, InputEvent::PointerUp(anchor - Vec2::new(100.0, 0.0)));
        assert_eq!(game.session().phase, GamePhase::Flying);

        let pan = game.session().camera.pan();
        send(&mut game, &mut ctx, InputEvent::KeyDown(Key::Retry));
        let session = game.session();
        assert_eq!(session.phase, GamePhase::Aiming);
        assert_eq!(session.current, 0);
        assert!(session.birds.iter().all(|b| !b.fired));
        assert_eq!(session.camera.pan(), pan);
        assert!(session.camera.is_animating() || pan == 0.0);
    }

    #[test]
    fn test_space_loads_next_bird() {
        let mut ctx = ctx();
        let mut game = shown(&mut ctx, LevelDescriptor::standard(1));
        let anchor = game.session().camera.to_screen(slingshot_anchor());
        send(&mut game, &mut ctx, InputEvent::PointerDown(anchor));
        send(&mut game, &mut ctx, InputEvent::PointerUp(anchor - Vec2::new(100.0, 0.0)));
        assert_eq!(game.session().phase, GamePhase::Flying);

        send(&mut game, &mut ctx, InputEvent::KeyDown(Key::NextBird));
        let session = game.session();
        assert_eq!(session.phase, GamePhase::Aiming);
        assert_eq!(session.current, 1);
        assert!(session.birds[0].fired);
    }

    #[test]
    fn test_pause_button_stops_propagation() {
        let mut ctx = ctx();
        let mut game = shown(&mut ctx, LevelDescriptor::standard(1));
        let mut requests = Vec::new();
        let result = game.handle_event(
            &InputEvent::PointerDown(Vec2::new(760.0, 40.0)),
            &mut Cx::new(&mut ctx, &mut requests),
        );
        assert_eq!(result, Propagation::Stop);
        assert!(game.session().paused);
    }

    #[test]
    fn test_clicks_elsewhere_propagate() {
        let mut ctx = ctx();
        let mut game = shown(&mut ctx, LevelDescriptor::standard(1));
        let mut requests = Vec::new();
        let result = game.handle_event(
            &InputEvent::PointerDown(Vec2::new(400.0, 300.0)),
            &mut Cx::new(&mut ctx, &mut requests),
        );
        assert_eq!(result, Propagation::Continue);
    }

    #[test]
    fn test_standard_win_persists_and_offers_next() {
        let mut ctx = ctx();
        let mut game = shown(&mut ctx, LevelDescriptor::standard(1));
        game.record(Outcome::Won { first_bird: true }, &mut ctx);

        assert_eq!(
            game.win(),
            Some(WinInfo {
                star: true,
                next: Some(LevelDescriptor::standard(2)),
                beat_game: false,
            })
        );
        assert_eq!(
            ctx.levels.level_status(LevelDescriptor::standard(1)),
            crate::level::LevelStatus::Starred
        );

        let mut requests = Vec::new();
        game.next_level(&mut Cx::new(&mut ctx, &mut requests));
        assert_eq!(
            requests,
            vec![NavRequest::ResetTop(Destination::Game(LevelDescriptor::standard(2)))]
        );
    }

    #[test]
    fn test_custom_win_is_not_persisted() {
        let mut ctx = ctx();
        let mut game = shown(&mut ctx, LevelDescriptor::custom(1));
        game.record(Outcome::Won { first_bird: true }, &mut ctx);
        assert_eq!(game.win().map(|w| w.star), Some(true));
        assert_eq!(ctx.levels.progress().highest_won, 0);

        let mut requests = Vec::new();
        game.next_level(&mut Cx::new(&mut ctx, &mut requests));
        assert_eq!(requests, vec![NavRequest::Pop]);
    }

    #[test]
    fn test_last_level_beats_game() {
        let mut ctx = ctx();
        let last = LevelDescriptor::standard(ctx.levels.standard_count());
        let mut game = shown(&mut ctx, last);
        game.record(Outcome::Won { first_bird: false }, &mut ctx);
        let win = game.win().unwrap();
        assert!(win.beat_game);
        assert!(!win.star);

        let mut requests = Vec::new();
        game.next_level(&mut Cx::new(&mut ctx, &mut requests));
        assert_eq!(requests, vec![NavRequest::Pop]);
    }

    #[test]
    fn test_draw_shows_hud_and_queue() {
        let mut ctx = ctx();
        let game = shown(&mut ctx, LevelDescriptor::standard(1));
        let mut out = DrawList::new();
        game.draw(&ctx, &mut out);
        let birds = out
            .iter()
            .filter(|c| matches!(c, DrawCmd::Sprite { name: "bird", .. }))
            .count();
        assert_eq!(birds, game.session().birds.len());
        assert!(out.texts().any(|t| t == "II"));
    }
}
