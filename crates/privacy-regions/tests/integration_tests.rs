//! Integration tests for Privacy Regions
//!
//! Tests combining multiple modules: algebra + rasterizer, mechanisms +
//! algebra, catalog + compositor.

use privacy_regions::{
    dp_composition_exact_total_var, intersect_regions, region_from_dp_composition_basic,
    region_from_dp_composition_exact, region_from_dp_params, region_from_dp_tv_params,
    region_from_gaussian_dp, region_from_gaussian_dp_composition, total_variation_bounds,
    AdditiveMechanism, Compositor, Constraint, GaussianMechanism, GridConfig, LaplaceMechanism,
    Mask, Mechanism, Rasterizer, Region, RegionKind, RegionSpec,
};

fn rasterizer(resolution: usize) -> Rasterizer {
    Rasterizer::new(GridConfig::default().with_resolution(resolution)).unwrap()
}

fn transpose(mask: &Mask) -> Mask {
    let n = mask.resolution();
    let mut out = Mask::filled(n, false);
    for row in 0..n {
        for col in 0..n {
            out.set(col, row, mask.get(row, col));
        }
    }
    out
}

// =============================================================================
// Region algebra on the grid
// =============================================================================

mod algebra_on_grid {
    use super::*;

    #[test]
    fn test_exact_composition_single_mechanism_matches_dp() {
        let r = rasterizer(50);
        let exact = r
            .rasterize(&region_from_dp_composition_exact(0.3, 0.3, 1).unwrap())
            .unwrap();
        let dp = r.rasterize(&region_from_dp_params(0.3, 0.3).unwrap()).unwrap();
        assert_eq!(exact, dp);
        assert!(dp.count() > 0);
    }

    #[test]
    fn test_basic_composition_single_mechanism_matches_dp() {
        let r = rasterizer(80);
        for &(eps, delta) in &[(0.0, 0.0), (0.7, 0.05), (2.5, 0.4)] {
            let basic = r
                .rasterize(&region_from_dp_composition_basic(eps, delta, 1).unwrap())
                .unwrap();
            let dp = r.rasterize(&region_from_dp_params(eps, delta).unwrap()).unwrap();
            assert_eq!(basic, dp, "eps = {}, delta = {}", eps, delta);
        }
    }

    #[test]
    fn test_pure_dp_region_is_symmetric() {
        let r = rasterizer(64);
        for &eps in &[0.0, 0.3, 1.0, 4.0] {
            let mask = r.rasterize(&region_from_dp_params(eps, 0.0).unwrap()).unwrap();
            assert_eq!(mask, transpose(&mask), "eps = {}", eps);
        }
    }

    #[test]
    fn test_zero_epsilon_zero_delta_is_the_diagonal() {
        // fp + fn ≥ 1 and fp + fn ≤ 1: nothing off the anti-diagonal survives
        let r = rasterizer(11);
        let mask = r.rasterize(&region_from_dp_params(0.0, 0.0).unwrap()).unwrap();
        for row in 0..11 {
            for col in 0..11 {
                if row + col != 10 {
                    assert!(!mask.get(row, col), "({}, {})", row, col);
                }
            }
        }
        assert!(mask.count() <= 11);
    }

    #[test]
    fn test_composition_is_monotone_in_k() {
        let r = rasterizer(100);
        let (eps, delta) = (0.4, 0.1);

        let mut previous = r.rasterize(&region_from_dp_composition_basic(eps, delta, 1).unwrap()).unwrap();
        for k in 2..=5 {
            let next = r
                .rasterize(&region_from_dp_composition_basic(eps, delta, k).unwrap())
                .unwrap();
            assert!(previous.is_subset_of(&next), "basic k = {}", k);
            previous = next;
        }

        let mut previous = r.rasterize(&region_from_dp_composition_exact(eps, delta, 1).unwrap()).unwrap();
        for k in 2..=4 {
            let next = r
                .rasterize(&region_from_dp_composition_exact(eps, delta, k).unwrap())
                .unwrap();
            assert!(previous.is_subset_of(&next), "exact k = {}", k);
            previous = next;
        }
    }

    #[test]
    fn test_total_variation_composition_is_monotone_in_k() {
        let r = rasterizer(100);
        let (eps, delta) = (0.6, 0.05);
        let (lower, upper) = total_variation_bounds(eps, delta).unwrap();
        let eta = lower + 0.5 * (upper - lower);

        let mut previous = r
            .rasterize(&dp_composition_exact_total_var(eps, delta, eta, 1).unwrap().region)
            .unwrap();
        let mut previous_tv = eta;
        for k in 2..=6 {
            let composed = dp_composition_exact_total_var(eps, delta, eta, k).unwrap();
            let next = r.rasterize(&composed.region).unwrap();
            assert!(previous.is_subset_of(&next), "k = {}", k);
            assert!(composed.total_variation >= previous_tv, "k = {}", k);
            previous = next;
            previous_tv = composed.total_variation;
        }
    }

    #[test]
    fn test_gaussian_dp_composition_is_monotone_in_count() {
        let r = rasterizer(100);
        let mut previous = r
            .rasterize(&region_from_gaussian_dp_composition(&[0.5]).unwrap())
            .unwrap();
        for n in 2..=6 {
            let next = r
                .rasterize(&region_from_gaussian_dp_composition(&vec![0.5; n]).unwrap())
                .unwrap();
            assert!(previous.is_subset_of(&next), "n = {}", n);
            assert!(next.count() > previous.count(), "n = {}", n);
            previous = next;
        }
    }

    #[test]
    fn test_exact_composition_tighter_than_basic() {
        let r = rasterizer(100);
        for k in 1..=6 {
            let exact = r
                .rasterize(&region_from_dp_composition_exact(0.5, 0.02, k).unwrap())
                .unwrap();
            let basic = r
                .rasterize(&region_from_dp_composition_basic(0.5, 0.02, k).unwrap())
                .unwrap();
            assert!(exact.count() <= basic.count(), "k = {}", k);
        }
    }

    #[test]
    fn test_intersection_is_pointwise_and() {
        let r = rasterizer(60);
        let a = region_from_dp_params(0.8, 0.05).unwrap();
        let b = region_from_gaussian_dp(1.5).unwrap();
        let both = intersect_regions(&[a.clone(), b.clone()]);

        let expected = r.rasterize(&a).unwrap().and(&r.rasterize(&b).unwrap());
        assert_eq!(r.rasterize(&both).unwrap(), expected);
    }

    #[test]
    fn test_total_variation_composition_at_upper_bound_refines_exact() {
        let r = rasterizer(100);
        let (eps, delta) = (0.6, 0.05);
        let (_, upper) = total_variation_bounds(eps, delta).unwrap();
        for k in 1..=4 {
            let tv = dp_composition_exact_total_var(eps, delta, upper, k).unwrap();
            let tv_mask = r.rasterize(&tv.region).unwrap();
            let exact = r
                .rasterize(&region_from_dp_composition_exact(eps, delta, k).unwrap())
                .unwrap();
            assert!(tv_mask.is_subset_of(&exact), "k = {}", k);
            assert!((0.0..=1.0).contains(&tv.total_variation));
        }
    }

    #[test]
    fn test_total_variation_tightens_dp_region() {
        let r = rasterizer(80);
        let dp = r.rasterize(&region_from_dp_params(1.0, 0.0).unwrap()).unwrap();
        let dp_tv = r.rasterize(&region_from_dp_tv_params(1.0, 0.0, 0.3).unwrap()).unwrap();
        assert!(dp_tv.is_subset_of(&dp));
        assert!(dp_tv.count() < dp.count());
    }

    #[test]
    fn test_outline_is_subset_of_filled() {
        let region = region_from_dp_params(0.5, 0.1).unwrap();
        let filled = Rasterizer::new(GridConfig::default().with_resolution(60))
            .unwrap()
            .rasterize(&region)
            .unwrap();
        let outline = Rasterizer::new(
            GridConfig::default()
                .with_resolution(60)
                .with_outline(Some(3)),
        )
        .unwrap()
        .rasterize(&region)
        .unwrap();
        assert!(outline.count() > 0);
        assert!(outline.count() < filled.count());
        // Outline mode ignores the simplex bound
        let simplex_free = Rasterizer::new(GridConfig::default().with_resolution(60))
            .unwrap()
            .rasterize(
                &Region::new(
                    region
                        .constraints()
                        .iter()
                        .filter(|c| !c.is_simplex())
                        .cloned()
                        .collect(),
                )
                .unwrap(),
            )
            .unwrap();
        assert!(outline.is_subset_of(&simplex_free));
    }
}

// =============================================================================
// Mechanisms
// =============================================================================

mod mechanisms {
    use super::*;

    fn reference_normal_cdf(x: f64) -> f64 {
        0.5 * (1.0 + libm::erf(x / std::f64::consts::SQRT_2))
    }

    #[test]
    fn test_gaussian_tv_matches_normal_cdf() {
        let m = GaussianMechanism::new(1.3, 0.3, 1.0).unwrap();
        let shift = 1.3 / (2.0 * (5.0f64 / 1.2).ln()).sqrt();
        assert!((m.shift() - shift).abs() < 1e-12);
        let expected = 2.0 * reference_normal_cdf(shift / 2.0) - 1.0;
        assert!((m.tv() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_gaussian_mechanism_region_is_gaussian_dp() {
        // The Gaussian mechanism curve is μ-GDP with μ = shift
        let r = rasterizer(80);
        let m = GaussianMechanism::new(1.0, 0.2, 3.0).unwrap();
        let mech = r.rasterize(&m.region_exact()).unwrap();
        let gdp = r.rasterize(&region_from_gaussian_dp(m.shift()).unwrap()).unwrap();
        assert_eq!(mech, gdp);
    }

    #[test]
    fn test_laplace_regions_are_nonempty_and_distinct() {
        let r = rasterizer(80);
        let m = LaplaceMechanism::new(1.0, 1.0).unwrap();
        let exact = r.rasterize(&m.region_exact()).unwrap();
        let tv = r.rasterize(&m.region_tv()).unwrap();
        assert!(exact.count() > 0);
        assert!(tv.count() > 0);
        assert_ne!(exact, tv);
    }

    #[test]
    fn test_larger_epsilon_means_larger_region() {
        let r = rasterizer(80);
        let tight = r
            .rasterize(&LaplaceMechanism::new(0.2, 1.0).unwrap().region_exact())
            .unwrap();
        let loose = r
            .rasterize(&LaplaceMechanism::new(2.0, 1.0).unwrap().region_exact())
            .unwrap();
        assert!(tight.is_subset_of(&loose));
        assert!(tight.count() < loose.count());
    }
}

// =============================================================================
// Compositor
// =============================================================================

mod compositing {
    use super::*;

    fn full_grid() -> Region {
        Region::new(vec![Constraint::half_plane(0.0, 0.0, 0.0)]).unwrap()
    }

    // fp ≤ 0.15 and fn ≤ 0.15: the 2×2 block in the low corner at resolution 10
    fn corner_block() -> Region {
        Region::new(vec![
            Constraint::half_plane(-1.0, 0.0, -0.15),
            Constraint::half_plane(0.0, -1.0, -0.15),
        ])
        .unwrap()
    }

    fn compositor() -> Compositor {
        Compositor::new(GridConfig::default().with_resolution(10)).unwrap()
    }

    #[test]
    fn test_small_block_visible_over_full_grid() {
        let mut c = compositor();
        let large = c.add(full_grid(), "everything").unwrap();
        let small = c.add(corner_block(), "corner").unwrap();
        assert_eq!((large, small), (0, 1));

        let r = c.render("scenario", None, true).unwrap();
        let small_layer = r.layer(small).unwrap();
        let large_layer = r.layer(large).unwrap();
        assert_eq!(small_layer.mask.count(), 4);
        assert_eq!(large_layer.mask.count(), 100);

        for row in 0..2 {
            for col in 0..2 {
                assert_eq!(r.colour_at(row, col), small_layer.colour);
            }
        }
        assert_eq!(r.colour_at(5, 5), large_layer.colour);
        assert_ne!(small_layer.colour, large_layer.colour);
    }

    #[test]
    fn test_containment_order_independent_of_insertion() {
        let mut c = compositor();
        let small = c.add(corner_block(), "corner").unwrap();
        c.add(full_grid(), "everything").unwrap();
        let r = c.render("reversed", None, true).unwrap();
        assert_eq!(r.top_layer_at(1, 1), Some(small));
        assert_eq!(r.layers[0].id, small);
    }

    #[test]
    fn test_prioritized_superset_covers_everything() {
        let mut c = compositor();
        let large = c.add(full_grid(), "everything").unwrap();
        c.add(corner_block(), "corner").unwrap();
        let r = c.render("priority", Some(large), true).unwrap();
        let colour = r.layer(large).unwrap().colour;
        for row in 0..10 {
            for col in 0..10 {
                assert_eq!(r.colour_at(row, col), colour);
            }
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut c = Compositor::new(GridConfig::default().with_resolution(40)).unwrap();
        c.add(region_from_dp_params(0.5, 0.1).unwrap(), "dp").unwrap();
        c.add(region_from_dp_composition_exact(0.5, 0.1, 3).unwrap(), "exact").unwrap();
        c.add(region_from_gaussian_dp(1.0).unwrap(), "gdp").unwrap();
        let first = c.render("twice", None, true).unwrap();
        let second = c.render("twice", None, true).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_and_sequential_renders_agree() {
        let build = |parallel: bool| {
            let mut c = Compositor::new(
                GridConfig::default()
                    .with_resolution(40)
                    .with_parallel(parallel),
            )
            .unwrap();
            for k in 1..=5 {
                c.add(
                    region_from_dp_composition_basic(0.3, 0.02, k).unwrap(),
                    format!("k = {}", k),
                )
                .unwrap();
            }
            c.render("order", None, true).unwrap()
        };
        assert_eq!(build(true), build(false));
    }

    #[test]
    fn test_removed_regions_are_not_rendered() {
        let mut c = compositor();
        let a = c.add(full_grid(), "a").unwrap();
        c.add(corner_block(), "b").unwrap();
        c.remove(a).unwrap();
        let r = c.render("after removal", None, true).unwrap();
        assert_eq!(r.layers.len(), 1);
        assert_eq!(r.legend[0].label, "b");
        assert_eq!(r.index_at(5, 5), 0);
    }
}

// =============================================================================
// Catalog + Compositor: scene description to image
// =============================================================================

mod scenes {
    use super::*;

    #[test]
    fn test_scene_from_json() {
        let json = r#"[
            {"kind": "dp", "epsilon": 0.6, "delta": 0.1},
            {"kind": "dp_exact_composition", "epsilon": 0.6, "delta": 0.1, "k": 3},
            {"kind": "intersection", "regions": [
                {"kind": "gaussian_dp", "mu": 1.0},
                {"kind": "laplace_tv", "epsilon": 1.0, "sensitivity": 1.0}
            ]}
        ]"#;
        let specs: Vec<RegionSpec> = serde_json::from_str(json).unwrap();

        let mut c = Compositor::new(GridConfig::default().with_resolution(30)).unwrap();
        for spec in &specs {
            c.add(spec.build().unwrap(), spec.graph_label()).unwrap();
        }
        let r = c.render("scene", None, true).unwrap();
        assert_eq!(r.legend.len(), 3);
        assert!(r
            .legend
            .iter()
            .any(|l| l.label == "DP exact comp. (ε: 0.60, δ: 0.10, k: 3)"));
    }

    #[test]
    fn test_catalog_defaults_render() {
        let mut c = Compositor::new(GridConfig::default().with_resolution(20)).unwrap();
        for kind in RegionKind::ALL {
            let spec = kind.spec(&kind.defaults()).unwrap();
            c.add(spec.build().unwrap(), spec.graph_label()).unwrap();
        }
        let r = c.render("catalog", None, false).unwrap();
        assert_eq!(r.layers.len(), RegionKind::ALL.len());
        assert!(r.layers.iter().all(|l| l.palette_index != 0));
    }
}
