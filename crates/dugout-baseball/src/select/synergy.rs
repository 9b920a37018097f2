// Pitch-mix synergy: how well a reliever's repertoire plays together.
//
// Rewards tunnelled fastball pairs, a well-separated changeup, a hard
// slider and two-way horizontal movement; penalizes a flat fastball/curve
// mix. Command scales the pair bonuses, and sub-50 control drags the whole
// figure down.

use crate::model::card::{has_rating, rating, Card};
use crate::model::pitch::PitchType;

pub const SYNERGY_MIN: f64 = -10.0;
pub const SYNERGY_MAX: f64 = 30.0;

/// Sinker/cutter pairs closer than this (mph) tunnel together.
const TUNNEL_GAP: f64 = 4.0;
const TUNNEL_BONUS: f64 = 8.0;
const SEPARATION_BONUS: f64 = 10.0;
const HARD_SLIDER_MPH: f64 = 88.0;
const FIRM_SLIDER_MPH: f64 = 85.0;
const TWO_PLANE_BONUS: f64 = 5.0;
const FLAT_MIX_PENALTY: f64 = -4.0;

/// Speeds of every pitch of `kind` that has a recorded velocity.
fn speeds(card: &Card, kind: PitchType) -> Vec<f64> {
    card.pitches
        .iter()
        .filter(|p| p.kind() == kind && has_rating(p.speed))
        .map(|p| rating(p.speed))
        .collect()
}

/// Best value of `f` over every pair drawn from `a` and `b`.
fn best_pair(a: &[f64], b: &[f64], f: impl Fn(f64) -> f64) -> f64 {
    a.iter()
        .flat_map(|x| b.iter().map(move |y| (x - y).abs()))
        .map(f)
        .fold(0.0, f64::max)
}

/// Fastball/changeup separation weight: 0 up to 6 mph, ramping to 1 at 10,
/// flat through 13, back to 0 at 18.
pub fn separation_weight(gap: f64) -> f64 {
    if gap <= 6.0 || gap >= 18.0 {
        0.0
    } else if gap < 10.0 {
        (gap - 6.0) / 4.0
    } else if gap <= 13.0 {
        1.0
    } else {
        (18.0 - gap) / 5.0
    }
}

pub fn pitch_mix_synergy(card: &Card) -> f64 {
    let control = rating(card.ratings.pitch_control);
    let control_factor = (control / 100.0).clamp(0.0, 1.0);

    let sinkers = speeds(card, PitchType::Sinker);
    let cutters = speeds(card, PitchType::Cutter);
    let tunnel = best_pair(&sinkers, &cutters, |gap| {
        if gap < TUNNEL_GAP {
            TUNNEL_BONUS * (TUNNEL_GAP - gap) / TUNNEL_GAP
        } else {
            0.0
        }
    });

    let four_seams = speeds(card, PitchType::FourSeam);
    let changeups = speeds(card, PitchType::Changeup);
    let separation = best_pair(&four_seams, &changeups, separation_weight) * SEPARATION_BONUS;

    let mut total = (tunnel + separation) * control_factor;

    if let Some(slider) = card.fastest(PitchType::Slider) {
        if slider >= HARD_SLIDER_MPH {
            total += 4.0;
        } else if slider >= FIRM_SLIDER_MPH {
            total += 2.0;
        }
    }

    let arm_side = card.pitch_types().any(|t| t.is_arm_side());
    let glove_side = card.pitch_types().any(|t| t.is_glove_side());
    if arm_side && glove_side {
        total += TWO_PLANE_BONUS;
    }

    let has_four_seam = card.pitch_types().any(|t| t == PitchType::FourSeam);
    let has_curve = card.pitch_types().any(|t| t.is_curve_family());
    if has_four_seam && has_curve && !glove_side {
        total += FLAT_MIX_PENALTY;
    }

    if control < 50.0 {
        total *= control / 50.0;
    }
    total.clamp(SYNERGY_MIN, SYNERGY_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::card::{CardId, Hand, Pitch, Ratings};
    use crate::model::position::Position;

    fn reliever(control: f64, pitches: &[(&str, f64)]) -> Card {
        Card {
            id: CardId::parse("rp"),
            name: "Reliever".into(),
            position: Position::ReliefPitcher,
            bat_hand: Hand::Right,
            throw_hand: Hand::Right,
            ratings: Ratings {
                pitch_control: Some(control),
                ..Default::default()
            },
            pitches: pitches
                .iter()
                .map(|(name, speed)| Pitch {
                    name: name.to_string(),
                    speed: Some(*speed),
                    control: None,
                    movement: None,
                })
                .collect(),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn sinker_cutter_tunnel_plus_two_plane() {
        let card = reliever(100.0, &[("Sinker", 92.0), ("Cutter", 90.0)]);
        // 8 * (4 - 2) / 4 = 4, plus 5 for arm-side + glove-side.
        assert!(approx(pitch_mix_synergy(&card), 9.0));
    }

    #[test]
    fn wide_sinker_cutter_gap_earns_no_tunnel() {
        let card = reliever(100.0, &[("Sinker", 95.0), ("Cutter", 88.0)]);
        assert!(approx(pitch_mix_synergy(&card), 5.0));
    }

    #[test]
    fn changeup_separation_sweet_spot() {
        let card = reliever(100.0, &[("4-Seam Fastball", 95.0), ("Circle Change", 84.0)]);
        assert!(approx(pitch_mix_synergy(&card), 10.0));
    }

    #[test]
    fn separation_weight_is_triangular() {
        assert_eq!(separation_weight(5.0), 0.0);
        assert_eq!(separation_weight(6.0), 0.0);
        assert!(approx(separation_weight(8.0), 0.5));
        assert_eq!(separation_weight(10.0), 1.0);
        assert_eq!(separation_weight(13.0), 1.0);
        assert!(approx(separation_weight(15.5), 0.5));
        assert_eq!(separation_weight(18.0), 0.0);
        assert_eq!(separation_weight(25.0), 0.0);
    }

    #[test]
    fn slider_velocity_tiers() {
        // Slider alone is glove-side only, so no two-plane bonus.
        assert!(approx(pitch_mix_synergy(&reliever(100.0, &[("Slider", 89.0)])), 4.0));
        assert!(approx(pitch_mix_synergy(&reliever(100.0, &[("Sweeper", 86.0)])), 2.0));
        assert!(approx(pitch_mix_synergy(&reliever(100.0, &[("Slider", 82.0)])), 0.0));
    }

    #[test]
    fn flat_fastball_curve_mix_penalized() {
        let card = reliever(100.0, &[("Four Seam", 94.0), ("Curveball", 78.0)]);
        assert!(approx(pitch_mix_synergy(&card), -4.0));
    }

    #[test]
    fn arm_side_pitch_does_not_lift_flat_mix_penalty() {
        let card = reliever(100.0, &[("Four Seam", 94.0), ("Curveball", 78.0), ("Sinker", 92.0)]);
        assert!(approx(pitch_mix_synergy(&card), -4.0));
        // A glove-side pitch does.
        let card = reliever(100.0, &[("Four Seam", 94.0), ("Curveball", 78.0), ("Cutter", 89.0)]);
        assert!(approx(pitch_mix_synergy(&card), 0.0));
    }

    #[test]
    fn poor_control_scales_everything() {
        let card = reliever(25.0, &[("4 Seam", 95.0), ("Changeup", 84.0)]);
        // 10 * 0.25 control factor, then halved again for control 25 < 50.
        assert!(approx(pitch_mix_synergy(&card), 1.25));
    }

    #[test]
    fn no_pitches_scores_zero() {
        assert_eq!(pitch_mix_synergy(&reliever(80.0, &[])), 0.0);
    }
}
