use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::similarity::{normalize_name, singularize};

/// Category for grocery store organization
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    VariantArray,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    Produce,
    Dairy,
    Meat,
    Seafood,
    Pantry,
    Frozen,
    Bakery,
    Beverages,
    #[default]
    Other,
}

/// Whole-name entries, checked before single words so "peanut butter" is not
/// filed under butter
const PHRASES: &[(&str, Category)] = &[
    ("ice cream", Category::Frozen),
    ("peanut butter", Category::Pantry),
    ("almond milk", Category::Beverages),
    ("coconut milk", Category::Pantry),
    ("sour cream", Category::Dairy),
    ("cream cheese", Category::Dairy),
    ("olive oil", Category::Pantry),
    ("vegetable oil", Category::Pantry),
    ("soy sauce", Category::Pantry),
    ("hot sauce", Category::Pantry),
    ("tomato sauce", Category::Pantry),
    ("tomato paste", Category::Pantry),
    ("canned tomato", Category::Pantry),
    ("chicken broth", Category::Pantry),
    ("beef broth", Category::Pantry),
    ("vegetable broth", Category::Pantry),
    ("baking powder", Category::Pantry),
    ("baking soda", Category::Pantry),
    ("vanilla extract", Category::Pantry),
    ("garlic powder", Category::Pantry),
    ("onion powder", Category::Pantry),
    ("chili powder", Category::Pantry),
    ("black pepper", Category::Pantry),
    ("cayenne pepper", Category::Pantry),
    ("bell pepper", Category::Produce),
    ("sweet potato", Category::Produce),
    ("green bean", Category::Produce),
    ("orange juice", Category::Beverages),
    ("sparkling water", Category::Beverages),
];

/// Head nouns (singular) and the aisle they live in
const KEYWORDS: &[(&str, Category)] = &[
    // Produce
    ("tomato", Category::Produce),
    ("onion", Category::Produce),
    ("shallot", Category::Produce),
    ("garlic", Category::Produce),
    ("lettuce", Category::Produce),
    ("carrot", Category::Produce),
    ("celery", Category::Produce),
    ("pepper", Category::Produce),
    ("cucumber", Category::Produce),
    ("zucchini", Category::Produce),
    ("broccoli", Category::Produce),
    ("cauliflower", Category::Produce),
    ("spinach", Category::Produce),
    ("kale", Category::Produce),
    ("cabbage", Category::Produce),
    ("potato", Category::Produce),
    ("mushroom", Category::Produce),
    ("avocado", Category::Produce),
    ("eggplant", Category::Produce),
    ("squash", Category::Produce),
    ("jalapeno", Category::Produce),
    ("jalapeño", Category::Produce),
    ("ginger", Category::Produce),
    ("cilantro", Category::Produce),
    ("parsley", Category::Produce),
    ("basil", Category::Produce),
    ("mint", Category::Produce),
    ("thyme", Category::Produce),
    ("rosemary", Category::Produce),
    ("scallion", Category::Produce),
    ("leek", Category::Produce),
    ("apple", Category::Produce),
    ("banana", Category::Produce),
    ("orange", Category::Produce),
    ("lemon", Category::Produce),
    ("lime", Category::Produce),
    ("strawberry", Category::Produce),
    ("blueberry", Category::Produce),
    ("raspberry", Category::Produce),
    ("grape", Category::Produce),
    ("mango", Category::Produce),
    ("pineapple", Category::Produce),
    ("watermelon", Category::Produce),
    // Dairy
    ("milk", Category::Dairy),
    ("cream", Category::Dairy),
    ("butter", Category::Dairy),
    ("cheese", Category::Dairy),
    ("cheddar", Category::Dairy),
    ("mozzarella", Category::Dairy),
    ("parmesan", Category::Dairy),
    ("feta", Category::Dairy),
    ("ricotta", Category::Dairy),
    ("yogurt", Category::Dairy),
    ("egg", Category::Dairy),
    // Meat
    ("chicken", Category::Meat),
    ("breast", Category::Meat),
    ("thigh", Category::Meat),
    ("turkey", Category::Meat),
    ("duck", Category::Meat),
    ("beef", Category::Meat),
    ("steak", Category::Meat),
    ("brisket", Category::Meat),
    ("pork", Category::Meat),
    ("chop", Category::Meat),
    ("bacon", Category::Meat),
    ("ham", Category::Meat),
    ("sausage", Category::Meat),
    ("lamb", Category::Meat),
    ("veal", Category::Meat),
    // Seafood
    ("fish", Category::Seafood),
    ("salmon", Category::Seafood),
    ("tuna", Category::Seafood),
    ("cod", Category::Seafood),
    ("tilapia", Category::Seafood),
    ("shrimp", Category::Seafood),
    ("prawn", Category::Seafood),
    ("lobster", Category::Seafood),
    ("crab", Category::Seafood),
    ("scallop", Category::Seafood),
    ("mussel", Category::Seafood),
    // Pantry
    ("flour", Category::Pantry),
    ("rice", Category::Pantry),
    ("pasta", Category::Pantry),
    ("spaghetti", Category::Pantry),
    ("penne", Category::Pantry),
    ("noodle", Category::Pantry),
    ("oat", Category::Pantry),
    ("quinoa", Category::Pantry),
    ("couscous", Category::Pantry),
    ("sugar", Category::Pantry),
    ("yeast", Category::Pantry),
    ("oil", Category::Pantry),
    ("vinegar", Category::Pantry),
    ("sauce", Category::Pantry),
    ("ketchup", Category::Pantry),
    ("mustard", Category::Pantry),
    ("mayonnaise", Category::Pantry),
    ("salt", Category::Pantry),
    ("paprika", Category::Pantry),
    ("cumin", Category::Pantry),
    ("coriander", Category::Pantry),
    ("turmeric", Category::Pantry),
    ("cinnamon", Category::Pantry),
    ("nutmeg", Category::Pantry),
    ("oregano", Category::Pantry),
    ("broth", Category::Pantry),
    ("stock", Category::Pantry),
    ("bean", Category::Pantry),
    ("chickpea", Category::Pantry),
    ("lentil", Category::Pantry),
    ("honey", Category::Pantry),
    ("syrup", Category::Pantry),
    ("jam", Category::Pantry),
    ("almond", Category::Pantry),
    ("walnut", Category::Pantry),
    ("pecan", Category::Pantry),
    ("cashew", Category::Pantry),
    ("peanut", Category::Pantry),
    ("seed", Category::Pantry),
    // Bakery
    ("bread", Category::Bakery),
    ("baguette", Category::Bakery),
    ("ciabatta", Category::Bakery),
    ("sourdough", Category::Bakery),
    ("tortilla", Category::Bakery),
    ("pita", Category::Bakery),
    ("bagel", Category::Bakery),
    ("croissant", Category::Bakery),
    ("bun", Category::Bakery),
    ("roll", Category::Bakery),
    // Beverages
    ("water", Category::Beverages),
    ("juice", Category::Beverages),
    ("coffee", Category::Beverages),
    ("tea", Category::Beverages),
    ("wine", Category::Beverages),
    ("beer", Category::Beverages),
    ("soda", Category::Beverages),
];

/// Categorize an ingredient by name
///
/// Anything starting with "frozen" is frozen. Otherwise known phrases win,
/// then the last word (the head noun, singularised), then any other word.
/// Unknown ingredients fall back to [`Category::Other`].
pub fn categorize(ingredient_name: &str) -> Category {
    let normalized = normalize_name(ingredient_name);

    if normalized.starts_with("frozen ") {
        return Category::Frozen;
    }

    let words: Vec<String> = normalized.split_whitespace().map(singularize).collect();
    let singular = words.join(" ");

    if let Some(category) = PHRASES
        .iter()
        .find(|(phrase, _)| singular.contains(phrase))
        .map(|(_, category)| *category)
    {
        return category;
    }

    words
        .iter()
        .rev()
        .find_map(|word| keyword_category(word))
        .unwrap_or_default()
}

fn keyword_category(word: &str) -> Option<Category> {
    KEYWORDS
        .iter()
        .find(|(keyword, _)| *keyword == word)
        .map(|(_, category)| *category)
}
