use bet_cube::prelude::*;

fn main() -> bet_cube::Result<()> {
    // Dec 1-21, 5.0-9.9 lbs, every hour, with the placeholder claims
    pool().sample_claims().run_local()
}
