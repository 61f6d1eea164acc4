use super::*;

#[test]
fn inactive_levels_read_zero() {
    let levels = BandLevels::new();
    levels.set(AudioBand::Bass, 0.7);
    assert_eq!(levels.level(AudioBand::Bass), 0.0);
    assert_eq!(levels.get(AudioBand::Bass), 0.7);
}

#[test]
fn active_levels_pass_through() {
    let levels = BandLevels::new();
    levels.set_active(true);
    levels.set(AudioBand::Treble, 0.25);
    assert_eq!(levels.level(AudioBand::Treble), 0.25);
    assert_eq!(levels.level(AudioBand::Mid), 0.0);
}

#[test]
fn clear_zeroes_every_band() {
    let levels = BandLevels::new();
    levels.set_active(true);
    for band in AudioBand::ALL {
        levels.set(band, 1.0);
    }
    levels.clear();
    for band in AudioBand::ALL {
        assert_eq!(levels.level(band), 0.0);
    }
}
