//! Greeting banner: headline, typewriter subtitle, and an age counter that
//! eases up from zero. Pure UI text, all strings from config.

use bevy::prelude::*;

use crate::core::config::EffectsConfig;
use crate::core::palette::BASE_COLORS;

pub struct BannerPlugin;

impl Plugin for BannerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_banner)
            .add_systems(Update, (type_subtitle, count_age));
    }
}

#[derive(Component)]
struct SubtitleText;

#[derive(Component)]
struct AgeText;

/// Subtitle reveal state; one character per timer fire.
#[derive(Resource)]
struct Typewriter {
    full: String,
    shown: usize,
    timer: Timer,
}

/// Eases 0 -> target over the configured duration.
#[derive(Resource)]
struct AgeCounter {
    target: u32,
    current: f32,
    per_second: f32,
}

fn setup_banner(mut commands: Commands, cfg: Res<EffectsConfig>) {
    let type_interval = 1.0 / cfg.greeting.type_rate.max(1.0);
    commands.insert_resource(Typewriter {
        full: cfg.greeting.subtitle.clone(),
        shown: 0,
        timer: Timer::from_seconds(type_interval, TimerMode::Repeating),
    });
    commands.insert_resource(AgeCounter {
        target: cfg.greeting.age,
        current: 0.0,
        per_second: cfg.greeting.age as f32 / cfg.greeting.age_count_duration.max(0.01),
    });

    commands
        .spawn(bevy::ui::Node {
            position_type: bevy::ui::PositionType::Absolute,
            top: Val::Px(24.0),
            left: Val::Px(0.0),
            right: Val::Px(0.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            row_gap: Val::Px(6.0),
            ..Default::default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(cfg.greeting.headline.clone()),
                TextFont {
                    font_size: 54.0,
                    ..Default::default()
                },
                TextColor(BASE_COLORS[0]),
            ));
            parent.spawn((
                Text::new(String::new()),
                TextFont {
                    font_size: 24.0,
                    ..Default::default()
                },
                TextColor(Color::WHITE),
                SubtitleText,
            ));
            parent.spawn((
                Text::new("0"),
                TextFont {
                    font_size: 34.0,
                    ..Default::default()
                },
                TextColor(BASE_COLORS[3]),
                AgeText,
            ));
        });
}

fn type_subtitle(
    time: Res<Time>,
    mut typewriter: ResMut<Typewriter>,
    mut q_text: Query<&mut Text, With<SubtitleText>>,
) {
    let total = typewriter.full.chars().count();
    if typewriter.shown >= total {
        return;
    }
    typewriter.timer.tick(time.delta());
    let advance = typewriter.timer.times_finished_this_tick() as usize;
    if advance == 0 {
        return;
    }
    typewriter.shown = (typewriter.shown + advance).min(total);
    if let Ok(mut text) = q_text.single_mut() {
        text.0 = typewriter.full.chars().take(typewriter.shown).collect();
    }
}

fn count_age(
    time: Res<Time>,
    mut counter: ResMut<AgeCounter>,
    mut q_text: Query<&mut Text, With<AgeText>>,
) {
    let target = counter.target as f32;
    if counter.current >= target {
        return;
    }
    counter.current = (counter.current + counter.per_second * time.delta_secs()).min(target);
    if let Ok(mut text) = q_text.single_mut() {
        text.0 = format!("{}", counter.current.floor() as u32);
    }
}
