//! Announcement text for standing changes

use crate::domain::entities::StandingChange;

/// Build the channel announcement for a standing change.
/// Returns `None` when nothing changed.
pub fn format_announcement(player: &str, change: &StandingChange) -> Option<String> {
    if !change.is_change() {
        return None;
    }

    let current = change.current;
    let mut message = format!("🎮 {}'s Leaderboard Update! 🎮\n\n", player);

    if change.is_first_sighting() {
        message.push_str(&format!(
            "{} has magically appeared on the leaderboard! Ranking: {} | Points: {}\n",
            player,
            current.rank,
            current.points_display()
        ));
        message.push_str(&format!("Did someone feed {} after midnight? 🌙🍔", player));
        return Some(message);
    }

    message.push_str(&format!("{} is on the move! ", player));

    let rank_delta = change.rank_delta();
    let rank_line = if rank_delta > 0 {
        format!("Climbing {} spots like a caffeinated squirrel! 🐿️☕\n", rank_delta)
    } else if rank_delta < 0 {
        format!("Slipped {} spots. Did someone oil the leaderboard? 🛢️😅\n", -rank_delta)
    } else {
        format!("Holding steady. {}'s got a death grip on that spot! 💪\n", player)
    };
    message.push_str(&rank_line);

    message.push_str(&format!(
        "New Ranking: {} | Points: {}\n",
        current.rank,
        current.points_display()
    ));

    let points_delta = change.points_delta();
    let points_line = if points_delta > 0 {
        format!("Gained {} points! Is {} secretly a points-eating monster? 👾🍴\n", points_delta, player)
    } else if points_delta < 0 {
        format!("Lost {} points. Did {} trade them for magic beans? 🌱🤔\n", -points_delta, player)
    } else {
        format!("Points unchanged. {}'s playing it cooler than a penguin's picnic! 🐧❄️\n", player)
    };
    message.push_str(&points_line);

    Some(message)
}
