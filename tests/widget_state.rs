// Integration tests (native) for the wheel's owned state and the shared
// palette. No wasm/browser APIs are touched here.

use lucky_wheel::WHEEL_COLORS;
use lucky_wheel::wheel::state::WheelState;

#[test]
fn add_appends_in_insertion_order_with_duplicates() {
    let mut wheel = WheelState::new();
    assert!(wheel.add_item("Pizza"));
    assert!(wheel.add_item("Tacos"));
    assert!(wheel.add_item("Pizza"));
    assert_eq!(wheel.items(), ["Pizza", "Tacos", "Pizza"]);
    assert_eq!(wheel.item_count(), 3);
}

#[test]
fn empty_add_is_silently_ignored() {
    let mut wheel = WheelState::new();
    assert!(!wheel.add_item(""));
    assert_eq!(wheel.item_count(), 0);
}

#[test]
fn remove_is_guarded_against_stale_indices() {
    let mut wheel = WheelState::new();
    wheel.add_item("A");
    wheel.add_item("B");
    assert!(wheel.remove_item(0));
    assert_eq!(wheel.items(), ["B"]);
    // Deleting the same position again past the end is a no-op.
    assert!(!wheel.remove_item(1));
    assert_eq!(wheel.items(), ["B"]);
}

#[test]
fn label_lookup_is_guarded() {
    let mut wheel = WheelState::new();
    wheel.add_item("Sushi");
    assert_eq!(wheel.label(0), Some("Sushi"));
    assert_eq!(wheel.label(1), None);
}

#[test]
fn rotation_accumulates_until_reset() {
    let mut wheel = WheelState::new();
    wheel.add_item("A");
    wheel.set_rotation_deg(1990.0);
    wheel.set_rotation_deg(4320.0);
    assert_eq!(wheel.rotation_deg(), 4320.0);

    wheel.reset();
    assert_eq!(wheel.rotation_deg(), 0.0);
    assert_eq!(wheel.item_count(), 0);
}

#[test]
fn reset_on_empty_state_is_idempotent() {
    let mut wheel = WheelState::new();
    wheel.reset();
    wheel.reset();
    assert_eq!(wheel.item_count(), 0);
    assert_eq!(wheel.rotation_deg(), 0.0);
}

#[test]
fn palette_is_nonempty_with_valid_hex_colors() {
    assert!(!WHEEL_COLORS.is_empty());
    for color in WHEEL_COLORS {
        assert!(color.starts_with('#') && color.len() == 7, "bad color {color}");
        assert!(
            color[1..].chars().all(|c| c.is_ascii_hexdigit()),
            "bad color {color}"
        );
    }
}
