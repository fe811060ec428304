//! Client-only guestbook: messages live in memory for the session, newest
//! first. Adding a message celebrates with a burst; turning a like on floats
//! a heart train up from the counter. Nothing is persisted.

use bevy::prelude::*;
use thiserror::Error;

use crate::core::config::EffectsConfig;
use crate::core::palette::color_for_index;
use crate::effects::transient::{queue_heart_train, EffectTrigger, StaggerQueue};
use crate::rendering::surface::SurfaceState;

pub struct GuestbookPlugin;

impl Plugin for GuestbookPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Guestbook>()
            .add_event::<GuestbookCommand>()
            .add_event::<MessageAdded>()
            .add_event::<LikeChanged>()
            .add_systems(Startup, setup_count_label)
            .add_systems(
                Update,
                (handle_commands, celebrate_changes, refresh_count_label).chain(),
            );
    }
}

/// Card accent colors, one per palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardColor {
    Pink,
    Purple,
    Teal,
    Yellow,
    Orange,
}

impl CardColor {
    pub fn color(self) -> Color {
        color_for_index(self as usize)
    }

    fn for_index(i: usize) -> Self {
        match i % 5 {
            0 => CardColor::Pink,
            1 => CardColor::Purple,
            2 => CardColor::Teal,
            3 => CardColor::Yellow,
            _ => CardColor::Orange,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GuestMessage {
    pub author: String,
    pub body: String,
    pub color: CardColor,
    pub likes: u32,
    pub liked: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuestbookError {
    #[error("author name is empty")]
    EmptyAuthor,
    #[error("message body is empty")]
    EmptyBody,
}

#[derive(Resource, Default)]
pub struct Guestbook {
    messages: Vec<GuestMessage>,
}

impl Guestbook {
    /// Insert a message at the front (newest first). Author and body are
    /// trimmed; blanks are rejected before anything is stored.
    pub fn add_message(
        &mut self,
        author: &str,
        body: &str,
        color: CardColor,
    ) -> Result<usize, GuestbookError> {
        let author = author.trim();
        let body = body.trim();
        if author.is_empty() {
            return Err(GuestbookError::EmptyAuthor);
        }
        if body.is_empty() {
            return Err(GuestbookError::EmptyBody);
        }
        self.messages.insert(
            0,
            GuestMessage {
                author: author.to_owned(),
                body: body.to_owned(),
                color,
                likes: 0,
                liked: false,
            },
        );
        Ok(0)
    }

    /// Flip the like on a message, mirroring the original toggle: liking
    /// increments the count, unliking decrements it. Returns the new state.
    pub fn toggle_like(&mut self, index: usize) -> Option<bool> {
        let msg = self.messages.get_mut(index)?;
        if msg.liked {
            msg.likes = msg.likes.saturating_sub(1);
            msg.liked = false;
        } else {
            msg.likes += 1;
            msg.liked = true;
        }
        Some(msg.liked)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[GuestMessage] {
        &self.messages
    }
}

/// Demo-app driver for the guestbook (there is no text-entry widget; sample
/// messages stand in for the original form).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestbookCommand {
    AddSample,
    LikeLatest,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct MessageAdded {
    pub index: usize,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct LikeChanged {
    pub index: usize,
    pub liked: bool,
}

const SAMPLE_MESSAGES: [(&str, &str); 5] = [
    ("Maya", "Happy birthday! Hope it's the best one yet."),
    ("Sam", "Another year, another adventure. Cheers!"),
    ("Priya", "Wishing you cake, confetti, and zero bugs."),
    ("Leo", "You made it around the sun again. Impressive."),
    ("June", "Here's to another amazing year of friendship!"),
];

fn handle_commands(
    mut commands_evr: EventReader<GuestbookCommand>,
    mut guestbook: ResMut<Guestbook>,
    mut added: EventWriter<MessageAdded>,
    mut liked: EventWriter<LikeChanged>,
) {
    for cmd in commands_evr.read() {
        match cmd {
            GuestbookCommand::AddSample => {
                let n = guestbook.len();
                let (author, body) = SAMPLE_MESSAGES[n % SAMPLE_MESSAGES.len()];
                match guestbook.add_message(author, body, CardColor::for_index(n)) {
                    Ok(index) => {
                        added.write(MessageAdded { index });
                    }
                    Err(e) => warn!("guestbook rejected message: {e}"),
                }
            }
            GuestbookCommand::LikeLatest => {
                if let Some(state) = guestbook.toggle_like(0) {
                    liked.write(LikeChanged {
                        index: 0,
                        liked: state,
                    });
                }
            }
        }
    }
}

fn celebrate_changes(
    mut added: EventReader<MessageAdded>,
    mut likes: EventReader<LikeChanged>,
    cfg: Res<EffectsConfig>,
    state: Res<SurfaceState>,
    mut effects: EventWriter<EffectTrigger>,
    mut queue: ResMut<StaggerQueue>,
) {
    for _ in added.read() {
        effects.write(EffectTrigger::burst_centered());
    }
    for change in likes.read() {
        // Hearts only when the like turns on, rising from the counter corner.
        if change.liked {
            let bounds = state.bounds();
            let origin = Vec2::new(
                (bounds.width - 120.0).max(0.0),
                (bounds.height - 60.0).max(0.0),
            );
            queue_heart_train(&mut queue, origin, &cfg);
        }
    }
}

#[derive(Component)]
struct GuestbookCountLabel;

fn setup_count_label(mut commands: Commands) {
    commands.spawn((
        Text::new("Guestbook (0)"),
        TextFont {
            font_size: 18.0,
            ..Default::default()
        },
        TextColor(Color::WHITE),
        bevy::ui::Node {
            position_type: bevy::ui::PositionType::Absolute,
            bottom: Val::Px(16.0),
            right: Val::Px(20.0),
            ..Default::default()
        },
        GuestbookCountLabel,
    ));
}

fn refresh_count_label(
    guestbook: Res<Guestbook>,
    mut q_text: Query<&mut Text, With<GuestbookCountLabel>>,
) {
    if !guestbook.is_changed() {
        return;
    }
    if let Ok(mut text) = q_text.single_mut() {
        let likes: u32 = guestbook.messages().iter().map(|m| m.likes).sum();
        text.0 = format!("Guestbook ({}) \u{2764} {}", guestbook.len(), likes);
    }
}
