use ridetune_core::units::angle_diff;
use ridetune_core::wind::{recommend_for, wind_toward_deg};
use ridetune_core::{
    compass16, recommend_headings, score_heading, wind_components, AngleInterval, HeadingOptions,
    WindKind, WindObservation, WindSide,
};

#[test]
fn west_wind_heading_east_is_pure_tailwind() {
    // vind FRA 270 (vest) blåser MOT 90 (øst)
    let s = score_heading(270.0, 12.0, 90.0, 0.4);
    assert!((s.tail - 12.0).abs() < 1e-9);
    assert!(s.cross.abs() < 1e-9);
    assert!((s.wind_toward_deg - 90.0).abs() < 1e-12);
    assert!((s.score - 12.0).abs() < 1e-9);

    let c = wind_components(90.0, 270.0, 12.0).unwrap();
    assert_eq!(c.kind, WindKind::Tailwind);
    assert!((c.headwind + 12.0).abs() < 1e-9);
}

#[test]
fn opposite_heading_is_pure_headwind() {
    for from in [0.0, 45.0, 190.0, 359.0] {
        let toward = wind_toward_deg(from);
        let into = score_heading(from, 8.0, toward + 180.0, 0.4);
        assert!((into.tail + 8.0).abs() < 1e-9);
        assert!(into.cross < 1e-9);

        let with = score_heading(from, 8.0, toward, 0.4);
        assert!((with.tail - 8.0).abs() < 1e-9);
        assert!(with.cross < 1e-9);
    }
}

#[test]
fn crosswind_is_penalized() {
    let s = score_heading(0.0, 10.0, 90.0, 0.4);
    assert!(s.tail.abs() < 1e-9);
    assert!((s.cross - 10.0).abs() < 1e-9);
    assert!((s.score + 4.0).abs() < 1e-9);
}

#[test]
fn best_heading_points_downwind() {
    let out = recommend_headings(270.0, 12.0, &HeadingOptions::default()).unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].heading_deg, 90.0);
    assert_eq!(out[0].compass, "E");
    // sortert synkende
    assert!(out.windows(2).all(|w| w[0].score >= w[1].score));
    // neste valg er ±15° unna toppen (70/75 osv. er for nær)
    assert_eq!(out[1].heading_deg, 75.0);
    assert_eq!(out[2].heading_deg, 105.0);
}

#[test]
fn selected_headings_respect_min_separation() {
    for from in [0.0, 37.0, 123.0, 271.0, 355.0] {
        for sep in [5.0, 15.0, 40.0, 90.0] {
            let opts = HeadingOptions { top_k: 6, min_separation_deg: sep, ..Default::default() };
            let out = recommend_headings(from, 7.5, &opts).unwrap();
            for (i, a) in out.iter().enumerate() {
                for b in &out[i + 1..] {
                    let d = angle_diff(a.heading_deg, b.heading_deg).abs();
                    assert!(d >= sep, "{} og {} er {d}° fra hverandre (min {sep})", a.heading_deg, b.heading_deg);
                }
            }
        }
    }
}

#[test]
fn large_separation_limits_count() {
    let opts = HeadingOptions { top_k: 10, min_separation_deg: 120.0, ..Default::default() };
    let out = recommend_headings(180.0, 5.0, &opts).unwrap();
    assert_eq!(out.len(), 3);
}

#[test]
fn allowed_intervals_wrap_across_north() {
    let opts = HeadingOptions {
        allowed: vec![AngleInterval::new(300.0, 30.0)],
        ..Default::default()
    };
    // vind fra nord → beste kurs ville vært 180, men den er ikke tillatt
    let out = recommend_headings(0.0, 10.0, &opts).unwrap();
    assert!(!out.is_empty());
    for c in &out {
        assert!(c.heading_deg >= 300.0 || c.heading_deg <= 30.0, "{} utenfor intervallet", c.heading_deg);
    }
    assert!(out[0].heading_deg == 300.0 || out[0].heading_deg == 30.0);
}

#[test]
fn empty_allowed_intersection_gives_empty_list() {
    let opts = HeadingOptions {
        step_deg: 10.0,
        allowed: vec![AngleInterval::new(11.0, 19.0)],
        ..Default::default()
    };
    assert_eq!(recommend_headings(0.0, 10.0, &opts), Some(vec![]));
}

#[test]
fn non_finite_wind_is_no_data() {
    let opts = HeadingOptions::default();
    assert!(recommend_headings(f64::NAN, 5.0, &opts).is_none());
    assert!(recommend_headings(90.0, f64::INFINITY, &opts).is_none());
    assert!(wind_components(0.0, f64::NAN, 3.0).is_none());

    let obs = WindObservation { from_deg: 200.0, speed: f64::NAN, gust: Some(9.0) };
    assert!(!obs.is_usable());
    assert!(recommend_for(&obs, &opts).is_none());
}

#[test]
fn components_side_and_kind() {
    // kurs nord, vind fra øst → fra høyre
    let c = wind_components(0.0, 90.0, 6.0).unwrap();
    assert_eq!(c.side, WindSide::Right);
    assert_eq!(c.kind, WindKind::Crosswind);
    assert!(c.headwind.abs() < 1e-9);

    // kurs nord, vind fra vest → fra venstre
    let c = wind_components(0.0, 270.0, 6.0).unwrap();
    assert_eq!(c.side, WindSide::Left);

    // kurs 350, vind fra 10 → motvind, litt fra høyre (wrap over nord)
    let c = wind_components(350.0, 10.0, 6.0).unwrap();
    assert_eq!(c.kind, WindKind::Headwind);
    assert_eq!(c.side, WindSide::Right);
    assert!(c.headwind > 5.0);

    let calm = wind_components(120.0, 300.0, 0.05).unwrap();
    assert_eq!(calm.kind, WindKind::Calm);
}

#[test]
fn components_agree_with_scoring_geometry() {
    for heading in (0..360).step_by(15) {
        let h = heading as f64;
        let s = score_heading(225.0, 9.0, h, 0.4);
        let c = wind_components(h, 225.0, 9.0).unwrap();
        assert!((s.tail + c.headwind).abs() < 1e-9, "heading {h}");
        assert!((s.cross - c.crosswind).abs() < 1e-9, "heading {h}");
    }
}

#[test]
fn compass_labels() {
    assert_eq!(compass16(0.0), "N");
    assert_eq!(compass16(22.5), "NNE");
    assert_eq!(compass16(45.0), "NE");
    assert_eq!(compass16(180.0), "S");
    assert_eq!(compass16(247.0), "WSW");
    assert_eq!(compass16(359.9), "N");
    assert_eq!(compass16(720.0 + 90.0), "E");
}
