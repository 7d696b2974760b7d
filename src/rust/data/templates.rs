//! Fixed sentence templates and product nouns used by the generator.
//!
//! Every template carries exactly one `{product}` placeholder.

pub const PRODUCT_PLACEHOLDER: &str = "{product}";

pub const POSITIVE_TEMPLATES: &[&str] = &[
    "I absolutely love {product}! It's amazing!",
    "This {product} exceeded my expectations. Highly recommend!",
    "Best {product} I've ever used. Five stars!",
    "So happy with my {product} purchase. Excellent quality!",
    "The {product} is fantastic! Worth every penny.",
    "I'm thrilled with this {product}. Outstanding!",
    "Couldn't be happier with my {product}. Perfect!",
    "This {product} is brilliant. Totally satisfied!",
    "Wonderful {product}! Will definitely buy again.",
    "Amazing {product}! Exceeded all my hopes.",
    "The {product} is incredible. Best decision ever!",
    "Really impressed with this {product}. Great value!",
    "Absolutely satisfied with the {product}. Superb quality!",
    "Love everything about this {product}!",
    "This {product} is awesome! Can't stop using it.",
    "This {product} is rad! Totally worth it!",
    "The {product} is rad. Best purchase ever!",
    "So rad! This {product} rocks!",
];

pub const NEUTRAL_TEMPLATES: &[&str] = &[
    "The {product} is okay. Nothing special.",
    "This {product} works as expected. Average.",
    "The {product} is fine for the price.",
    "Got this {product} yesterday. It's alright.",
    "The {product} does what it's supposed to do.",
    "This {product} is decent. Not great, not terrible.",
    "The {product} is acceptable. Could be better.",
    "It's a standard {product}. Nothing remarkable.",
    "The {product} meets basic expectations.",
    "This {product} is neither good nor bad.",
    "The {product} works fine. No complaints.",
    "Average {product}. Gets the job done.",
    "The {product} is adequate for my needs.",
    "This {product} is pretty standard. No surprises.",
    "The {product} is mediocre. Just okay.",
];

pub const NEGATIVE_TEMPLATES: &[&str] = &[
    "Terrible {product}. Complete waste of money.",
    "Very disappointed with this {product}. Poor quality.",
    "The {product} broke after one day. Horrible!",
    "Would not recommend this {product} to anyone. Awful!",
    "Worst {product} ever. Total disappointment.",
    "This {product} is garbage. Save your money.",
    "Extremely unhappy with the {product}. Defective!",
    "The {product} is terrible. Regret buying it.",
    "Don't buy this {product}. It's useless!",
    "Awful {product}. Nothing works as advertised.",
    "Horrible experience with this {product}. Very poor!",
    "The {product} is a complete letdown. Disappointing!",
    "This {product} is junk. Waste of time and money.",
    "Really bad {product}. Doesn't work at all.",
    "Terrible quality {product}. Would return if I could.",
    "This {product} is meh. Not worth the money.",
    "The {product} is pretty meh. Very disappointing.",
    "Meh, this {product} doesn't work well.",
];

pub const PRODUCTS: &[&str] = &[
    "smartphone",
    "laptop",
    "headphones",
    "coffee maker",
    "vacuum cleaner",
    "camera",
    "tablet",
    "watch",
    "speaker",
    "monitor",
    "keyboard",
    "mouse",
    "charger",
    "case",
    "stand",
    "adapter",
    "cable",
    "battery",
    "backpack",
    "desk",
];
