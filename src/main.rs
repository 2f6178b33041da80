use anyhow::Result;
use clap::Parser;
use demtile::prelude::*;
use std::time::Instant;

fn main() -> Result<()> {
    let args = Cli::parse();

    let field = load_height_field(&args.src_path)?;
    let builder = TerrainBuilder::new(args.terrain_config()?);

    let start = Instant::now();
    let bar = GenerateBar::new("Tessellating".to_string());

    let tile_set = if args.colliders {
        builder.build_with_colliders_and_progress(
            &field,
            &args.collider_config(),
            Some(bar.callback()),
        )?
    } else {
        builder.build_with_progress(&field, Some(bar.callback()))?
    };

    bar.finish();

    println!(
        "Generated {} tiles with {} vertices and {} triangles",
        tile_set.len(),
        tile_set.vertex_count(),
        tile_set.triangle_count(),
    );

    if !tile_set.colliders.is_empty() {
        let collider_triangles: usize = tile_set
            .colliders
            .iter()
            .map(|collider| collider.mesh.triangle_count())
            .sum();
        println!("Collider proxies retain {collider_triangles} triangles");
    }

    println!("Generation took: {:?}", start.elapsed());

    Ok(())
}
