use crate::collection::Document;
use crate::errors::PantryResult;

// name, description, price, category, image
const SAMPLE_MENU: [(&str, &str, f64, &str, &str); 12] = [
    (
        "Margherita Pizza",
        "Fresh San Marzano tomatoes, buffalo mozzarella, fresh basil, extra virgin olive oil",
        16.99,
        "pizza",
        "https://images.unsplash.com/photo-1604382354936-07c5d9983bd3",
    ),
    (
        "Pepperoni Supreme",
        "Premium pepperoni, mozzarella cheese, rich tomato sauce, oregano",
        19.99,
        "pizza",
        "https://images.unsplash.com/photo-1565299624946-b28f40a0ca4b",
    ),
    (
        "Truffle Mushroom Pizza",
        "Wild mushrooms, truffle oil, mozzarella, arugula, parmesan shavings",
        24.99,
        "pizza",
        "https://images.unsplash.com/photo-1513104890138-7c749659a591",
    ),
    (
        "Gourmet Beef Burger",
        "Wagyu beef patty, aged cheddar, caramelized onions, truffle aioli, brioche bun",
        18.99,
        "burger",
        "https://images.unsplash.com/photo-1568901346375-23c9450c58cd",
    ),
    (
        "BBQ Bacon Burger",
        "Beef patty, crispy bacon, BBQ sauce, onion rings, cheddar cheese",
        16.99,
        "burger",
        "https://images.unsplash.com/photo-1571091718767-18b5b1457add",
    ),
    (
        "Chicken Avocado Burger",
        "Grilled chicken breast, fresh avocado, lettuce, tomato, herb mayo",
        15.99,
        "burger",
        "https://images.unsplash.com/photo-1606755962773-d324e9a13086",
    ),
    (
        "Lobster Ravioli",
        "Fresh lobster ravioli in creamy saffron sauce with cherry tomatoes",
        28.99,
        "pasta",
        "https://images.unsplash.com/photo-1551183053-bf91a1d81141",
    ),
    (
        "Truffle Carbonara",
        "Fresh pasta with eggs, pecorino romano, pancetta, black truffle shavings",
        22.99,
        "pasta",
        "https://images.unsplash.com/photo-1473093295043-cdd812d0e601",
    ),
    (
        "Seafood Linguine",
        "Fresh linguine with shrimp, scallops, mussels in white wine garlic sauce",
        26.99,
        "pasta",
        "https://images.unsplash.com/photo-1551892374-ecf8754cf8b0",
    ),
    (
        "Chocolate Lava Cake",
        "Warm chocolate cake with molten center, vanilla ice cream, berry compote",
        9.99,
        "dessert",
        "https://images.unsplash.com/photo-1578985545062-69928b1d9587",
    ),
    (
        "Classic Tiramisu",
        "Traditional Italian dessert with mascarpone, coffee, cocoa, ladyfingers",
        8.99,
        "dessert",
        "https://images.unsplash.com/photo-1571877227200-a0d98ea607e9",
    ),
    (
        "Crème Brûlée",
        "Vanilla custard with caramelized sugar crust, fresh berries",
        10.99,
        "dessert",
        "https://images.unsplash.com/photo-1470324161839-ce2bb6fa6bc3",
    ),
];

/// The sample menu a fresh store is seeded with, IDs 1 through 12.
pub(crate) fn sample_menu_items() -> PantryResult<Vec<Document>> {
    let mut items = Vec::with_capacity(SAMPLE_MENU.len());
    for (index, (name, description, price, category, image_url)) in SAMPLE_MENU.iter().enumerate() {
        let mut item = Document::new();
        item.put("id", index as i64 + 1)?;
        item.put("name", *name)?;
        item.put("description", *description)?;
        item.put("price", *price)?;
        item.put("category", *category)?;
        item.put("imageUrl", *image_url)?;
        item.put("available", true)?;
        items.push(item);
    }
    Ok(items)
}
