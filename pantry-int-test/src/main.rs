use pantry::doc;
use pantry::errors::PantryResult;
use pantry_int_test::test_util::{cleanup, create_test_context};

fn main() -> PantryResult<()> {
    colog::init();
    println!("Starting stress test...");
    let ctx = create_test_context()?;
    let db = ctx.db();

    // every insert rewrites the whole collection file, so keep this modest
    let count = 2000;

    let start = std::time::Instant::now();
    for i in 0..count {
        db.insert(
            "orders",
            doc! {
                customer: (uuid::Uuid::new_v4().to_string()),
                total: (i as f64 * 1.5),
                status: "PENDING",
            },
        )?;
    }
    println!("Inserted {} orders in {:?}", count, start.elapsed());

    let start = std::time::Instant::now();
    let pending = db.find_by_field("orders", "status", "PENDING")?;
    println!("Found {} pending orders in {:?}", pending.len(), start.elapsed());

    let start = std::time::Instant::now();
    for order in pending.iter().take(count / 2) {
        if let Some(id) = order.get("id").and_then(|id| id.as_i64()) {
            db.update("orders", &id.to_string(), doc! { status: "DELIVERED" })?;
        }
    }
    println!("Delivered {} orders in {:?}", count / 2, start.elapsed());

    let start = std::time::Instant::now();
    let reopened = ctx.reopen()?;
    println!(
        "Reloaded {} orders in {:?}",
        reopened.count("orders")?,
        start.elapsed()
    );

    cleanup(ctx)
}
