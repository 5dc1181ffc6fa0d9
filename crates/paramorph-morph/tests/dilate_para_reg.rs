//! Parabolic binary dilation regression test
//!
//! Tests dilation by discs and boxes: the reference scenarios, the
//! monotonicity and growth properties, shape-mode routing, anisotropic
//! spacing, elliptical reach, frozen axes, extreme radii and file
//! configuration. The canonical shapes are also checked byte for byte
//! against golden grid files.

use paramorph_core::BGrid;
use paramorph_morph::{
    BinaryDilatePara, DilateParaConfig, ShapeMode, dilate_para, dilate_para_uniform, load_config,
};
use paramorph_test::{RegParams, grid_from_ascii, grid_to_ascii, regout_dir};

/// Grid with a single foreground voxel
fn single_voxel(dims: &[usize], at: &[usize]) -> BGrid {
    let mut grid = BGrid::new(dims).unwrap();
    grid.set(at, 1).unwrap();
    grid
}

/// Irregular test pattern with foreground near the border and inside
fn pattern() -> BGrid {
    grid_from_ascii(
        "
        #...............
        ................
        ....##..........
        ....#.......#...
        ................
        .........#......
        ................
        ..#.........###.
        ................
        ................
        ...............#
        ",
    )
}

// ==========================================================================
// Test 1: Reference scenarios
// ==========================================================================

#[test]
fn dilate_para_reg_scenarios() {
    let mut rp = RegParams::new("dilate_para_scenarios");

    // A: 1-D disc of radius 2
    let input = single_voxel(&[9], &[4]);
    let out = dilate_para_uniform(&input, 2.0, ShapeMode::Circular).unwrap();
    let expected = BGrid::from_data(&[9], vec![0, 0, 1, 1, 1, 1, 1, 0, 0]).unwrap();
    rp.compare_grids(&expected, &out);

    // B: 3x3 box around a single voxel
    let input = single_voxel(&[5, 5], &[2, 2]);
    let out = dilate_para(&input, &[1.0, 1.0], ShapeMode::Rectangular).unwrap();
    let expected = grid_from_ascii(
        "
        .....
        .###.
        .###.
        .###.
        .....
        ",
    );
    rp.compare_grids(&expected, &out);

    // C: unit disc keeps the diagonal neighbours out
    let out = dilate_para(&input, &[1.0, 1.0], ShapeMode::Circular).unwrap();
    let expected = grid_from_ascii(
        "
        .....
        ..#..
        .###.
        ..#..
        .....
        ",
    );
    rp.compare_grids(&expected, &out);
    if rp.display() {
        eprintln!("{}", grid_to_ascii(&out));
    }

    // D: empty input stays empty
    for shape in [ShapeMode::Circular, ShapeMode::Rectangular] {
        for dims in [&[9][..], &[6, 4][..], &[3, 4, 5][..]] {
            let empty = BGrid::new(dims).unwrap();
            let radius = vec![2.5; dims.len()];
            let out = dilate_para(&empty, &radius, shape).unwrap();
            rp.compare_values(0.0, out.count_nonzero() as f64, 0.0);
            rp.check(out.dims() == dims);
        }
    }

    assert!(rp.cleanup(), "dilate_para scenario tests failed");
}

// ==========================================================================
// Test 2: Zero radius and monotonicity
// ==========================================================================

#[test]
fn dilate_para_reg_monotonic() {
    let mut rp = RegParams::new("dilate_para_monotonic");
    let input = pattern();

    for shape in [ShapeMode::Circular, ShapeMode::Rectangular] {
        // Zero and tiny radii leave the foreground unchanged
        for r in [0.0, 1e-3] {
            let out = dilate_para_uniform(&input, r, shape).unwrap();
            rp.compare_grids(&input, &out);
        }

        let radii = [0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 4.5];
        let outputs: Vec<BGrid> = radii
            .iter()
            .map(|&r| dilate_para_uniform(&input, r, shape).unwrap())
            .collect();
        rp.check(input.is_subset_of(&outputs[0]).unwrap());
        for pair in outputs.windows(2) {
            rp.check(pair[0].is_subset_of(&pair[1]).unwrap());
            rp.check(pair[0].count_nonzero() <= pair[1].count_nonzero());
        }

        // Componentwise larger radius vector
        let small = dilate_para(&input, &[1.0, 2.0], shape).unwrap();
        let large = dilate_para(&input, &[3.0, 2.0], shape).unwrap();
        rp.check(small.is_subset_of(&large).unwrap());
    }

    // A disc fits inside the box of the same radius
    for r in [1.0, 2.0, 3.5] {
        let disc = dilate_para_uniform(&input, r, ShapeMode::Circular).unwrap();
        let block = dilate_para_uniform(&input, r, ShapeMode::Rectangular).unwrap();
        rp.check(disc.is_subset_of(&block).unwrap());
    }

    assert!(rp.cleanup(), "dilate_para monotonicity tests failed");
}

// ==========================================================================
// Test 3: Repeated dilation grows
// ==========================================================================

#[test]
fn dilate_para_reg_growth() {
    let mut rp = RegParams::new("dilate_para_growth");
    let input = pattern();

    for shape in [ShapeMode::Circular, ShapeMode::Rectangular] {
        for r in [1.0, 2.0] {
            let once = dilate_para_uniform(&input, r, shape).unwrap();
            let twice = dilate_para_uniform(&once, r, shape).unwrap();
            rp.check(once.is_subset_of(&twice).unwrap());
        }
    }

    // Boxes compose exactly: box(1) twice is box(2)
    let twice = dilate_para_uniform(
        &dilate_para_uniform(&input, 1.0, ShapeMode::Rectangular).unwrap(),
        1.0,
        ShapeMode::Rectangular,
    )
    .unwrap();
    let direct = dilate_para_uniform(&input, 2.0, ShapeMode::Rectangular).unwrap();
    rp.compare_grids(&direct, &twice);

    assert!(rp.cleanup(), "dilate_para growth tests failed");
}

// ==========================================================================
// Test 4: Shape mode routing
// ==========================================================================

#[test]
fn dilate_para_reg_mode_switch() {
    let mut rp = RegParams::new("dilate_para_mode_switch");

    let input = single_voxel(&[11, 11], &[5, 5]);
    let mut filter = BinaryDilatePara::new(2);
    filter.set_radius_scalar(2.0);

    let disc = filter.update(&input).unwrap().clone();
    rp.compare_values(13.0, disc.count_nonzero() as f64, 0.0);

    rp.check(filter.circular_off());
    rp.check(filter.is_stale());
    let block = filter.update(&input).unwrap().clone();
    rp.compare_values(25.0, block.count_nonzero() as f64, 0.0);
    rp.check(disc != block);
    rp.check(!filter.is_stale());

    rp.check(filter.circular_on());
    let back = filter.update(&input).unwrap().clone();
    rp.compare_grids(&disc, &back);

    // Non-unit inside value is written to the foreground
    filter.set_inside_value(255);
    let out = filter.update(&input).unwrap();
    rp.check(out.data().iter().all(|&v| v == 0 || v == 255));
    rp.compare_values(13.0, out.count_nonzero() as f64, 0.0);

    assert!(rp.cleanup(), "dilate_para mode switch tests failed");
}

// ==========================================================================
// Test 5: Physical spacing
// ==========================================================================

#[test]
fn dilate_para_reg_spacing() {
    let mut rp = RegParams::new("dilate_para_spacing");

    let input = single_voxel(&[11, 11], &[5, 5])
        .with_spacing(&[1.0, 2.0])
        .unwrap();
    let mut filter = BinaryDilatePara::new(2);
    filter.set_radius_scalar(2.0);

    // Spacing is ignored until enabled
    let iso = filter.update(&input).unwrap().clone();
    rp.compare_values(13.0, iso.count_nonzero() as f64, 0.0);

    rp.check(filter.set_use_image_spacing(true));
    let aniso = filter.update(&input).unwrap().clone();
    let expected = grid_from_ascii(
        "
        ...........
        ...........
        ...........
        ...........
        .....#.....
        ...#####...
        .....#.....
        ...........
        ...........
        ...........
        ...........
        ",
    );
    rp.compare_grids(&expected, &aniso);
    rp.check(iso != aniso);
    rp.check(aniso.spacing() == [1.0, 2.0]);

    // A box reaches 2 units: two samples along x, one along y
    filter.circular_off();
    let block = filter.update(&input).unwrap();
    rp.compare_values(15.0, block.count_nonzero() as f64, 0.0);
    rp.compare_values(1.0, block.get(&[3, 4]).unwrap() as f64, 0.0);
    rp.compare_values(0.0, block.get(&[5, 3]).unwrap() as f64, 0.0);

    assert!(rp.cleanup(), "dilate_para spacing tests failed");
}

// ==========================================================================
// Test 6: Unequal and frozen radii
// ==========================================================================

#[test]
fn dilate_para_reg_anisotropic_radius() {
    let mut rp = RegParams::new("dilate_para_anisotropic");
    let input = single_voxel(&[11, 11], &[5, 5]);

    // Ellipse with semi-axes 3 and 1
    let ellipse = dilate_para(&input, &[3.0, 1.0], ShapeMode::Circular).unwrap();
    let expected = grid_from_ascii(
        "
        ...........
        ...........
        ...........
        ...........
        .....#.....
        ..#######..
        .....#.....
        ...........
        ...........
        ...........
        ...........
        ",
    );
    rp.compare_grids(&expected, &ellipse);

    let block = dilate_para(&input, &[3.0, 1.0], ShapeMode::Rectangular).unwrap();
    rp.compare_values(21.0, block.count_nonzero() as f64, 0.0);

    // Ellipse with semi-axes 2 and 4, inclusive at the tips
    let tall = dilate_para(&input, &[2.0, 4.0], ShapeMode::Circular).unwrap();
    rp.compare_values(1.0, tall.get(&[5, 1]).unwrap() as f64, 0.0);
    rp.compare_values(1.0, tall.get(&[3, 5]).unwrap() as f64, 0.0);
    rp.compare_values(0.0, tall.get(&[3, 4]).unwrap() as f64, 0.0);
    rp.compare_values(0.0, tall.get(&[5, 0]).unwrap() as f64, 0.0);

    // Frozen axes do not grow, whatever the reason
    for frozen in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        for shape in [ShapeMode::Circular, ShapeMode::Rectangular] {
            let out = dilate_para(&input, &[2.0, frozen], shape).unwrap();
            rp.compare_values(5.0, out.count_nonzero() as f64, 0.0);
            rp.compare_values(1.0, out.get(&[7, 5]).unwrap() as f64, 0.0);
            rp.compare_values(0.0, out.get(&[5, 6]).unwrap() as f64, 0.0);
        }
    }

    assert!(rp.cleanup(), "dilate_para anisotropic tests failed");
}

// ==========================================================================
// Test 7: Three dimensions
// ==========================================================================

#[test]
fn dilate_para_reg_3d() {
    let mut rp = RegParams::new("dilate_para_3d");
    let input = single_voxel(&[7, 7, 7], &[3, 3, 3]);

    let cases = [
        (1.0, ShapeMode::Circular, 7.0),
        (1.5, ShapeMode::Circular, 19.0),
        (1.8, ShapeMode::Circular, 27.0),
        (1.0, ShapeMode::Rectangular, 27.0),
        (2.0, ShapeMode::Rectangular, 125.0),
    ];
    for (r, shape, count) in cases {
        let out = dilate_para_uniform(&input, r, shape).unwrap();
        rp.compare_values(count, out.count_nonzero() as f64, 0.0);
    }

    // Sphere clipped by the grid boundary
    let corner = single_voxel(&[5, 5, 5], &[0, 0, 0]);
    let out = dilate_para_uniform(&corner, 1.0, ShapeMode::Circular).unwrap();
    rp.compare_values(4.0, out.count_nonzero() as f64, 0.0);

    // Wrong dimensionality is reported by the proximity stage
    let mut filter = BinaryDilatePara::new(3);
    filter.set_radius_scalar(1.0);
    let err = filter.generate_data(&single_voxel(&[5, 5], &[2, 2])).unwrap_err();
    rp.check(err.stage().is_some());
    rp.check(filter.output().is_none());

    assert!(rp.cleanup(), "dilate_para 3d tests failed");
}

// ==========================================================================
// Test 8: Configuration file
// ==========================================================================

#[test]
fn dilate_para_reg_config_file() {
    let mut rp = RegParams::new("dilate_para_config");

    let path = format!("{}/dilate_para_config.json", regout_dir());
    std::fs::write(
        &path,
        r#"{ "radius": [3.0, 1.0], "shape": "rectangular", "inside_value": 255 }"#,
    )
    .expect("write config failed");
    let config = load_config(&path).expect("load_config failed");
    rp.check(config.shape == ShapeMode::Rectangular);
    rp.check(!config.use_image_spacing);

    let input = single_voxel(&[11, 11], &[5, 5]);
    let mut filter = BinaryDilatePara::from_config(2, &config).unwrap();
    let out = filter.update(&input).unwrap();
    rp.compare_values(21.0, out.count_nonzero() as f64, 0.0);
    rp.compare_values(255.0, out.get(&[8, 6]).unwrap() as f64, 0.0);

    // Re-applying the same file is not a modification
    let count = filter.modified_count();
    rp.check(!filter.apply_config(&config).unwrap());
    rp.compare_values(count as f64, filter.modified_count() as f64, 0.0);

    // A default configuration switches back to a zero-radius disc
    rp.check(filter.apply_config(&DilateParaConfig::default()).unwrap());
    let out = filter.update(&input).unwrap();
    rp.compare_grids(&input, out);

    assert!(rp.cleanup(), "dilate_para config tests failed");
}

// ==========================================================================
// Test 9: Extreme radii
// ==========================================================================

#[test]
fn dilate_para_reg_extreme_radius() {
    let mut rp = RegParams::new("dilate_para_extreme");
    let shapes = [ShapeMode::Circular, ShapeMode::Rectangular];

    // Radii whose square overflows reach everything but create nothing
    for r in [1e150, 1e155, 1e300, f64::MAX] {
        for shape in shapes {
            let empty = BGrid::new(&[6, 4]).unwrap();
            let out = dilate_para_uniform(&empty, r, shape).unwrap();
            rp.compare_values(0.0, out.count_nonzero() as f64, 0.0);

            let input = single_voxel(&[4, 3], &[1, 1]);
            let out = dilate_para_uniform(&input, r, shape).unwrap();
            rp.compare_values(12.0, out.count_nonzero() as f64, 0.0);
        }
    }

    // One huge semi-axis next to a unit one
    let input = single_voxel(&[4, 3], &[0, 1]);
    for shape in shapes {
        let out = dilate_para(&input, &[1.0, 1e155], shape).unwrap();
        rp.compare_values(6.0, out.count_nonzero() as f64, 0.0);
        rp.compare_values(0.0, out.get(&[2, 0]).unwrap() as f64, 0.0);
        rp.compare_values(1.0, out.get(&[1, 2]).unwrap() as f64, 0.0);

        let empty = BGrid::new(&[4, 3]).unwrap();
        let out = dilate_para(&empty, &[1.0, 1e155], shape).unwrap();
        rp.compare_values(0.0, out.count_nonzero() as f64, 0.0);
    }

    // A needle: no reach along x, unbounded along y
    let input = single_voxel(&[4, 3], &[1, 1]);
    let out = dilate_para(&input, &[1e-300, 1e300], ShapeMode::Circular).unwrap();
    let expected = grid_from_ascii(
        "
        .#..
        .#..
        .#..
        ",
    );
    rp.compare_grids(&expected, &out);

    assert!(rp.cleanup(), "dilate_para extreme radius tests failed");
}

// ==========================================================================
// Test 10: Large radius boundary
// ==========================================================================

#[test]
fn dilate_para_reg_large_radius_boundary() {
    let mut rp = RegParams::new("dilate_para_large_radius");

    let r = 3000usize;
    let input = single_voxel(&[r + 1, 3], &[0, 0]);
    let out = dilate_para_uniform(&input, r as f64, ShapeMode::Circular).unwrap();

    // Exactly on the circle, and one row outside it
    rp.compare_values(1.0, out.get(&[r, 0]).unwrap() as f64, 0.0);
    rp.compare_values(0.0, out.get(&[r, 1]).unwrap() as f64, 0.0);
    rp.compare_values(0.0, out.get(&[r, 2]).unwrap() as f64, 0.0);
    rp.compare_values(1.0, out.get(&[r - 1, 2]).unwrap() as f64, 0.0);

    // Integer membership test over the whole grid
    let expected = (0..3usize)
        .flat_map(|y| (0..=r).map(move |x| x * x + y * y))
        .filter(|&d2| d2 <= r * r)
        .count();
    rp.compare_values(expected as f64, out.count_nonzero() as f64, 0.0);

    let block = dilate_para_uniform(&input, r as f64, ShapeMode::Rectangular).unwrap();
    rp.compare_values(((r + 1) * 3) as f64, block.count_nonzero() as f64, 0.0);

    assert!(rp.cleanup(), "dilate_para large radius tests failed");
}

// ==========================================================================
// Test 11: Golden shapes
// ==========================================================================

#[test]
fn dilate_para_reg_golden_shapes() {
    let mut rp = RegParams::new("dilate_para_shapes");

    // 1-3: scenarios A, B and C
    let line = single_voxel(&[9], &[4]);
    let out = dilate_para_uniform(&line, 2.0, ShapeMode::Circular).unwrap();
    rp.write_grid_and_check(&out).unwrap();
    let centre = single_voxel(&[5, 5], &[2, 2]);
    for shape in [ShapeMode::Rectangular, ShapeMode::Circular] {
        let out = dilate_para_uniform(&centre, 1.0, shape).unwrap();
        rp.write_grid_and_check(&out).unwrap();
    }

    // 4-5: ellipse and box with semi-axes 3 and 1
    let centre = single_voxel(&[11, 11], &[5, 5]);
    for shape in [ShapeMode::Circular, ShapeMode::Rectangular] {
        let out = dilate_para(&centre, &[3.0, 1.0], shape).unwrap();
        rp.write_grid_and_check(&out).unwrap();
    }

    // 6-7: sphere and cube
    let voxel = single_voxel(&[7, 7, 7], &[3, 3, 3]);
    let out = dilate_para_uniform(&voxel, 1.5, ShapeMode::Circular).unwrap();
    rp.write_grid_and_check(&out).unwrap();
    let out = dilate_para_uniform(&voxel, 1.0, ShapeMode::Rectangular).unwrap();
    rp.write_grid_and_check(&out).unwrap();

    // 8: disc over the irregular pattern
    let out = dilate_para_uniform(&pattern(), 2.5, ShapeMode::Circular).unwrap();
    rp.write_grid_and_check(&out).unwrap();

    // 9: disc in physical units, spacing carried to the output
    let input = centre.with_spacing(&[1.0, 2.0]).unwrap();
    let mut filter = BinaryDilatePara::new(2);
    filter.set_radius_scalar(2.0);
    filter.set_use_image_spacing(true);
    rp.write_grid_and_check(filter.update(&input).unwrap()).unwrap();

    // Written files read back as the same grids
    let path = format!("{}/dilate_para_shapes.09.grid", regout_dir());
    let back = BGrid::read_from_file(&path).unwrap();
    rp.compare_grids(filter.output().unwrap(), &back);
    rp.check(back.spacing() == [1.0, 2.0]);

    assert!(rp.cleanup(), "dilate_para golden shape tests failed");
}
