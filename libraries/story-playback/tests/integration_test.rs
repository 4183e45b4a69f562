//! Integration tests for the player controller
//!
//! Drive the controller through whole listening sessions the way a host
//! would: events in, effects out, media callbacks fed back.

use rand::rngs::StdRng;
use rand::SeedableRng;
use story_playback::{
    Direction, Effect, EndOfStoryPolicy, HitTarget, Key, PlaybackPhase, PlayerConfig,
    PlayerController, PlayerEvent, PlaytimeReport, Point, Story, ThemeCatalog, ViewMode,
};
use std::time::Duration;

// ===== Test Helpers =====

fn catalog() -> ThemeCatalog {
    serde_json::from_str(
        r#"{"Piraten": [{"titel":"A"},{"titel":"B"}], "Drachen": [{"titel":"C"}]}"#,
    )
    .unwrap()
}

fn player(config: PlayerConfig) -> PlayerController<StdRng> {
    let mut player = PlayerController::with_rng(config, StdRng::seed_from_u64(42));
    player.handle(PlayerEvent::CatalogLoaded(catalog()), Duration::ZERO);
    player
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn loaded_url(effects: &[Effect]) -> Option<&str> {
    effects.iter().find_map(|effect| match effect {
        Effect::LoadSource { url } => Some(url.as_str()),
        _ => None,
    })
}

fn reports(effects: &[Effect]) -> Vec<PlaytimeReport> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::ReportPlaytime(report) => Some(report.clone()),
            _ => None,
        })
        .collect()
}

/// Press at `from`, release at `to` after `elapsed`
fn swipe(
    player: &mut PlayerController<StdRng>,
    from: Point,
    to: Point,
    start: Duration,
    elapsed: Duration,
) -> Vec<Effect> {
    player.handle(
        PlayerEvent::GestureStarted {
            point: from,
            target: HitTarget::Surface,
        },
        start,
    );
    player.handle(PlayerEvent::GestureMoved { point: to }, start + elapsed / 2);
    player.handle(PlayerEvent::GestureEnded { point: to }, start + elapsed)
}

// ===== Catalog =====

#[test]
fn catalog_order_drives_theme_order() {
    let player = player(PlayerConfig::carousel());
    assert_eq!(player.session().theme_order(), ["Piraten", "Drachen"]);
    assert_eq!(player.session().current_theme_index(), Some(0));
}

#[test]
fn catalog_failure_leaves_player_empty() {
    let mut player = PlayerController::new(PlayerConfig::carousel());
    let effects = player.handle(
        PlayerEvent::CatalogFailed {
            message: "HTTP 500".into(),
        },
        Duration::ZERO,
    );

    assert!(effects.is_empty());
    assert!(player.catalog().is_empty());
    assert_eq!(player.session().phase(), PlaybackPhase::Idle);

    // Navigation on an empty carousel does nothing
    assert!(player
        .handle(PlayerEvent::Navigate(Direction::Next), ms(10))
        .is_empty());
}

#[test]
fn reloading_catalog_resets_session() {
    let mut player = player(PlayerConfig::carousel());
    player.handle(PlayerEvent::Navigate(Direction::Next), ms(0));
    player.handle(PlayerEvent::TransitionSettled, ms(300));
    assert_eq!(player.session().current_theme_index(), Some(1));

    let replacement = ThemeCatalog::from_pairs(vec![("Elfen", vec![Story::new("Lied")])]);
    player.handle(PlayerEvent::CatalogLoaded(replacement), ms(400));

    assert_eq!(player.session().theme_order(), ["Elfen"]);
    assert_eq!(player.session().current_theme_index(), Some(0));
    assert_eq!(player.session().current_story_title(), Some("Lied"));
}

// ===== Grid =====

#[test]
fn selecting_single_story_theme_always_resolves_to_it() {
    let mut player = player(PlayerConfig::grid());

    for round in 0..10u64 {
        let effects = player.handle(
            PlayerEvent::ThemeSelected {
                theme: "Drachen".into(),
            },
            ms(round * 1000),
        );
        if player.session().selected_theme().is_some() {
            assert_eq!(loaded_url(&effects), Some("/api/audio/Drachen/C"));
            assert_eq!(player.session().current_story_title(), Some("C"));
        }
    }
}

#[test]
fn shuffle_never_repeats_in_two_story_theme() {
    let mut player = player(PlayerConfig::grid());
    player.handle(
        PlayerEvent::ThemeSelected {
            theme: "Piraten".into(),
        },
        ms(0),
    );

    let mut previous = player.session().current_story_title().unwrap().to_string();
    for round in 1..20u64 {
        player.handle(PlayerEvent::ShuffleClicked, ms(round * 100));
        let title = player.session().current_story_title().unwrap().to_string();
        assert_ne!(title, previous, "round {round} repeated {title}");
        previous = title;
    }
}

#[test]
fn grid_end_of_story_rerolls() {
    let mut player = player(PlayerConfig::grid());
    player.handle(
        PlayerEvent::ThemeSelected {
            theme: "Piraten".into(),
        },
        ms(0),
    );
    player.handle(PlayerEvent::MediaPlayed, ms(0));
    let first = player.session().current_story_title().unwrap().to_string();

    let effects = player.handle(PlayerEvent::MediaEnded, ms(90_000));

    assert_eq!(
        reports(&effects),
        vec![PlaytimeReport {
            theme: "Piraten".into(),
            title: first.clone(),
            duration: 90,
        }]
    );
    assert!(effects.contains(&Effect::Play));
    assert_ne!(player.session().current_story_title(), Some(first.as_str()));
}

#[test]
fn volume_and_seek_in_grid() {
    let mut player = player(PlayerConfig::grid());
    player.handle(
        PlayerEvent::ThemeSelected {
            theme: "Drachen".into(),
        },
        ms(0),
    );

    // Seek ignored until metadata arrives
    assert!(player
        .handle(PlayerEvent::SeekInput { percent: 50.0 }, ms(1))
        .is_empty());

    let effects = player.handle(
        PlayerEvent::MetadataLoaded {
            duration: Duration::from_secs(120),
        },
        ms(2),
    );
    assert_eq!(effects, vec![Effect::EnableSeek]);

    let effects = player.handle(PlayerEvent::SeekInput { percent: 50.0 }, ms(3));
    assert_eq!(
        effects,
        vec![Effect::Seek {
            position: Duration::from_secs(60)
        }]
    );

    let effects = player.handle(
        PlayerEvent::TimeUpdate {
            position: Duration::from_secs(30),
        },
        ms(4),
    );
    assert_eq!(
        effects,
        vec![Effect::Progress {
            percent: 25.0,
            current: "0:30".into(),
            total: "2:00".into(),
        }]
    );

    player.handle(PlayerEvent::VolumeInput { level: 40 }, ms(5));
    let effects = player.handle(PlayerEvent::MuteClicked, ms(6));
    assert_eq!(
        effects,
        vec![Effect::SetVolume { level: 0 }, Effect::SetMuteIcon { muted: true }]
    );
    let effects = player.handle(PlayerEvent::MuteClicked, ms(7));
    assert_eq!(
        effects,
        vec![Effect::SetVolume { level: 40 }, Effect::SetMuteIcon { muted: false }]
    );
}

#[test]
fn grid_advance_theme_policy_moves_to_next_card() {
    let mut config = PlayerConfig::grid();
    config.end_of_story = EndOfStoryPolicy::AdvanceTheme;
    let mut player = player(config);

    player.handle(
        PlayerEvent::ThemeSelected {
            theme: "Piraten".into(),
        },
        ms(0),
    );
    let effects = player.handle(PlayerEvent::MediaEnded, ms(5_000));

    assert!(effects.contains(&Effect::HighlightTheme(Some("Drachen".into()))));
    assert_eq!(player.session().selected_theme(), Some("Drachen"));
    assert_eq!(loaded_url(&effects), Some("/api/audio/Drachen/C"));
}

// ===== Carousel =====

#[test]
fn navigating_left_from_first_wraps_to_last() {
    let mut player = player(PlayerConfig::carousel());

    let effects = player.handle(PlayerEvent::KeyPressed(Key::ArrowLeft), ms(0));
    assert!(effects.contains(&Effect::AnimateTo {
        offset: 0,
        duration: ms(300)
    }));
    assert_eq!(loaded_url(&effects), Some("/api/audio/Drachen/C"));
    assert_eq!(player.session().logical_theme_index(), -1);

    let effects = player.handle(PlayerEvent::TransitionSettled, ms(300));
    assert_eq!(effects, vec![Effect::SnapTo { offset: 2 }]);
    assert_eq!(player.session().logical_theme_index(), 1);
    assert!(player.session().invariants_hold());
}

#[test]
fn navigation_rejected_while_transitioning() {
    let mut player = player(PlayerConfig::carousel());

    player.handle(PlayerEvent::Navigate(Direction::Next), ms(0));
    let effects = player.handle(PlayerEvent::Navigate(Direction::Next), ms(100));

    assert!(effects.is_empty());
    assert_eq!(player.session().current_theme_index(), Some(1));
}

#[test]
fn short_swipe_is_ignored() {
    let mut player = player(PlayerConfig::carousel());
    let effects = swipe(
        &mut player,
        Point::new(200.0, 100.0),
        Point::new(160.0, 100.0),
        ms(0),
        ms(200),
    );

    assert!(effects.is_empty());
    assert!(!player.session().is_transitioning());
}

#[test]
fn quick_flat_swipe_navigates() {
    let mut player = player(PlayerConfig::carousel());

    // Leftward swipe of 90 units advances
    let effects = swipe(
        &mut player,
        Point::new(200.0, 100.0),
        Point::new(110.0, 110.0),
        ms(0),
        ms(200),
    );
    assert!(effects.contains(&Effect::AnimateTo {
        offset: 2,
        duration: ms(300)
    }));
    player.handle(PlayerEvent::TransitionSettled, ms(500));

    // Rightward swipe goes back
    swipe(
        &mut player,
        Point::new(110.0, 100.0),
        Point::new(200.0, 90.0),
        ms(1_000),
        ms(200),
    );
    player.handle(PlayerEvent::TransitionSettled, ms(1_500));
    assert_eq!(player.session().current_theme_index(), Some(0));
}

#[test]
fn slow_or_steep_swipes_are_ignored() {
    let mut player = player(PlayerConfig::carousel());

    let slow = swipe(
        &mut player,
        Point::new(300.0, 100.0),
        Point::new(100.0, 100.0),
        ms(0),
        ms(600),
    );
    let steep = swipe(
        &mut player,
        Point::new(300.0, 100.0),
        Point::new(100.0, 250.0),
        ms(1_000),
        ms(100),
    );

    assert!(slow.is_empty());
    assert!(steep.is_empty());
}

#[test]
fn swipe_starting_on_control_is_ignored() {
    let mut player = player(PlayerConfig::carousel());
    player.handle(
        PlayerEvent::GestureStarted {
            point: Point::new(300.0, 100.0),
            target: HitTarget::Control,
        },
        ms(0),
    );
    let effects = player.handle(
        PlayerEvent::GestureEnded {
            point: Point::new(100.0, 100.0),
        },
        ms(100),
    );
    assert!(effects.is_empty());
}

#[test]
fn moving_away_pauses_and_reports_playtime() {
    let mut player = player(PlayerConfig::carousel());
    let effects = player.handle(PlayerEvent::PlayPauseClicked, ms(0));
    assert_eq!(effects, vec![Effect::Play]);
    player.handle(PlayerEvent::MediaPlayed, ms(0));
    let title = player.session().current_story_title().unwrap().to_string();

    let effects = player.handle(PlayerEvent::Navigate(Direction::Next), ms(12_400));

    assert_eq!(
        reports(&effects),
        vec![PlaytimeReport {
            theme: "Piraten".into(),
            title,
            duration: 12,
        }]
    );
    assert!(effects.contains(&Effect::Pause));
    assert!(!effects.contains(&Effect::Play));
    assert_eq!(player.session().phase(), PlaybackPhase::Paused);

    // The media element confirms the pause; nothing left to report
    let effects = player.handle(PlayerEvent::MediaPaused, ms(12_500));
    assert!(reports(&effects).is_empty());
}

#[test]
fn autoplay_on_navigate_starts_next_theme() {
    let mut config = PlayerConfig::carousel();
    config.autoplay_on_navigate = true;
    let mut player = player(config);

    let effects = player.handle(PlayerEvent::Navigate(Direction::Next), ms(0));
    assert!(effects.contains(&Effect::Play));
}

#[test]
fn carousel_end_of_story_picks_next_in_theme() {
    let mut player = player(PlayerConfig::carousel());
    player.handle(PlayerEvent::MediaPlayed, ms(0));
    let first = player.session().current_story_title().unwrap().to_string();

    let effects = player.handle(PlayerEvent::MediaEnded, ms(60_000));

    assert_eq!(reports(&effects).len(), 1);
    assert!(effects.contains(&Effect::Play));
    assert_eq!(player.session().current_theme_index(), Some(0));
    assert_ne!(player.session().current_story_title(), Some(first.as_str()));
}

#[test]
fn indicator_tap_jumps_directly() {
    let mut player = player(PlayerConfig::carousel());
    let effects = player.handle(PlayerEvent::IndicatorTapped { index: 1 }, ms(0));

    assert!(effects.contains(&Effect::AnimateTo {
        offset: 2,
        duration: ms(300)
    }));
    assert!(player
        .handle(PlayerEvent::IndicatorTapped { index: 7 }, ms(10))
        .is_empty());
}

#[test]
fn short_listen_is_not_reported() {
    let mut player = player(PlayerConfig::carousel());
    player.handle(PlayerEvent::MediaPlayed, ms(0));

    let effects = player.handle(PlayerEvent::MediaPaused, ms(900));
    assert!(reports(&effects).is_empty());
    assert_eq!(player.session().play_started_at(), None);
}

#[test]
fn unload_flushes_once() {
    let mut player = player(PlayerConfig::carousel());
    player.handle(PlayerEvent::MediaPlayed, ms(1_000));

    let first = player.handle(PlayerEvent::Unload, ms(5_000));
    let second = player.handle(PlayerEvent::Unload, ms(6_000));

    assert_eq!(reports(&first)[0].duration, 4);
    assert!(second.is_empty());
}

#[test]
fn grid_ignores_gestures_and_navigation() {
    let mut player = player(PlayerConfig::grid());
    assert_eq!(player.config().view_mode, ViewMode::Grid);

    let effects = swipe(
        &mut player,
        Point::new(300.0, 100.0),
        Point::new(100.0, 100.0),
        ms(0),
        ms(100),
    );
    assert!(effects.is_empty());
    assert!(player
        .handle(PlayerEvent::KeyPressed(Key::ArrowRight), ms(200))
        .is_empty());
}
