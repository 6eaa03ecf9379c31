//! Static multilingual lexicon: verbs, number words, phrase translations,
//! stopwords, and product alias rules.
//!
//! Tables cover English plus the Spanish and Hindi vocabulary observed in
//! shopper transcripts. Hindi appears both in Devanagari and in the Latin
//! transliterations speech-to-text engines commonly emit.

use vc_protocol::CommandAction;

/// Verb aliases per action, tried in declaration order; the first action
/// with a whole-word hit wins.
pub const ACTION_VERBS: &[(CommandAction, &[&str])] = &[
    (
        CommandAction::Add,
        &["add", "need", "buy", "want", "agrega", "necesito", "comprar", "chahiye", "mujhe"],
    ),
    (
        CommandAction::Remove,
        &["remove", "delete", "quit", "elimina", "quita", "hatao", "nikalo"],
    ),
    (
        CommandAction::Update,
        &["update", "change", "set", "modify", "actualiza", "cambia", "badal", "set karo"],
    ),
    (
        CommandAction::Search,
        &["find", "search", "look", "buscar", "encuentra", "dhundo", "khojo"],
    ),
];

/// Spelled-out numbers zero through ten in English, Spanish, and Hindi.
pub const NUMBER_WORDS: &[(&str, u32)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("uno", 1),
    ("dos", 2),
    ("tres", 3),
    ("cuatro", 4),
    ("cinco", 5),
    ("seis", 6),
    ("siete", 7),
    ("ocho", 8),
    ("nueve", 9),
    ("diez", 10),
    ("ek", 1),
    ("do", 2),
    ("teen", 3),
    ("char", 4),
    ("paanch", 5),
    ("chhe", 6),
    ("saat", 7),
    ("aath", 8),
    ("nau", 9),
    ("das", 10),
    ("ekk", 1),
    ("un", 1),
    ("una", 1),
    ("unaa", 1),
    ("एक", 1),
    ("दो", 2),
    ("तीन", 3),
    ("चार", 4),
    ("पांच", 5),
    ("पाँच", 5),
    ("छः", 6),
    ("छह", 6),
    ("सात", 7),
    ("आठ", 8),
    ("नौ", 9),
    ("दस", 10),
];

/// Whole-phrase translations applied during normalization, longest first.
/// Multi-word phrases must come through intact, so these are matched on
/// token windows, never on substrings.
pub const PHRASE_REPLACEMENTS: &[(&str, &str)] = &[
    ("pasta dental", "toothpaste"),
    ("aceite de cocina", "cooking oil"),
    ("गेहूं का आटा", "whole wheat flour"),
    ("गेहूँ का आटा", "whole wheat flour"),
    ("दांत का पेस्ट", "toothpaste"),
    ("मुँह धोने का", "mouthwash"),
    // Spanish verbs.
    ("agrega", "add"),
    ("añade", "add"),
    ("anade", "add"),
    ("necesito", "need"),
    ("quiero", "want"),
    ("compra", "buy"),
    ("comprar", "buy"),
    ("elimina", "remove"),
    ("quita", "remove"),
    ("busca", "find"),
    ("encuentra", "find"),
    // Hindi verbs; "जोड़ो" (jodo) is listed in both nukta compositions
    // because speech-to-text output is not consistently normalized.
    ("मुझे", "need"),
    ("चाहिए", "need"),
    ("चाहिये", "need"),
    ("\u{091c}\u{094b}\u{095c}\u{094b}", "add"),
    ("\u{091c}\u{094b}\u{0921}\u{093c}\u{094b}", "add"),
    ("डालो", "add"),
    ("हटाओ", "remove"),
    ("निकालो", "remove"),
    ("ढूंढो", "find"),
    ("ढूँढो", "find"),
    ("खोजो", "find"),
    // Hindi units.
    ("किलो", "kg"),
    ("किलोग्राम", "kg"),
    ("ग्राम", "g"),
    ("लीटर", "liter"),
    ("मिलीलीटर", "ml"),
    ("बोतलें", "bottles"),
    ("बोतल", "bottle"),
    ("पैक", "pack"),
    ("पीस", "piece"),
    ("टुकड़े", "pieces"),
    ("टुकड़ा", "piece"),
    // Spanish product nouns.
    ("manzanas", "apples"),
    ("manzana", "apple"),
    ("platanos", "bananas"),
    ("platano", "banana"),
    ("bananos", "bananas"),
    ("banano", "banana"),
    ("naranjas", "oranges"),
    ("naranja", "orange"),
    ("leche", "milk"),
    ("pan", "bread"),
    ("arroz", "rice"),
    ("harina", "flour"),
    ("tomates", "tomatoes"),
    ("tomate", "tomato"),
    ("patatas", "potatoes"),
    ("patata", "potato"),
    ("papas", "potatoes"),
    ("papa", "potato"),
    ("cebollas", "onions"),
    ("cebolla", "onion"),
    ("huevos", "eggs"),
    ("huevo", "egg"),
    ("mantequilla", "butter"),
    ("yogur", "yogurt"),
    ("jabon", "soap"),
    ("champu", "shampoo"),
    ("agua", "water"),
    ("aceite", "oil"),
    ("cafe", "coffee"),
    ("té", "tea"),
    ("te", "tea"),
    // Hindi product nouns, Devanagari.
    ("सेब", "apples"),
    ("केला", "banana"),
    ("केले", "bananas"),
    ("संतरा", "orange"),
    ("संतरे", "oranges"),
    ("दूध", "milk"),
    ("ब्रेड", "bread"),
    ("चावल", "rice"),
    ("आटा", "flour"),
    ("टमाटर", "tomatoes"),
    ("आलू", "potatoes"),
    ("प्याज", "onions"),
    ("प्याज़", "onions"),
    ("अंडा", "egg"),
    ("अंडे", "eggs"),
    ("मक्खन", "butter"),
    ("दही", "yogurt"),
    ("पनीर", "paneer"),
    ("टूथपेस्ट", "toothpaste"),
    ("साबुन", "soap"),
    ("शैम्पू", "shampoo"),
    ("चॉकलेट", "chocolate"),
    ("किटकैट", "kitkat chocolate"),
    ("पर्क", "perk chocolate"),
    ("कॉफी", "coffee"),
    ("चाय", "tea"),
    ("पानी", "water"),
    ("तेल", "oil"),
    // Hindi product nouns, Latin transliterations.
    ("seb", "apples"),
    ("kela", "banana"),
    ("kele", "bananas"),
    ("santara", "orange"),
    ("santre", "oranges"),
    ("doodh", "milk"),
    ("atta", "flour"),
    ("tamatar", "tomatoes"),
    ("aloo", "potatoes"),
    ("pyaz", "onions"),
    ("ande", "eggs"),
    ("paani", "water"),
];

/// Filler words stripped from the residual item text, all locales mixed.
pub const STOPWORDS: &[&str] = &[
    "i", "me", "my", "please", "the", "a", "an", "to", "for", "on", "in", "list", "from", "by",
    "of", "need", "want", "buy", "add", "remove", "delete", "set", "update", "change", "find",
    "search", "look", "brand", "price", "under", "below", "less", "than", "max", "up", "at",
    "most", "show", "mujhe", "mera", "meri", "lista", "mi", "por", "con", "ki", "ko", "mein",
    "se", "de", "la", "el", "una", "un", "necesito", "quiero", "comprar", "agrega", "anade",
    "añade", "busca", "encuentra",
];

/// Post-parse correction: spoken brand or nickname implies a specific
/// catalog product.
pub struct ProductAliasRule {
    pub aliases: &'static [&'static str],
    pub item: &'static str,
    pub brand: &'static str,
}

pub const PRODUCT_ALIAS_RULES: &[ProductAliasRule] = &[
    ProductAliasRule { aliases: &["kitkat", "kit kat"], item: "kitkat chocolate", brand: "Nestle" },
    ProductAliasRule { aliases: &["perk"], item: "perk chocolate", brand: "Cadbury" },
];

/// Item names the generative model falls back to when it cannot identify
/// the product; the rule result is preferred over these.
pub const GENERIC_ITEMS: &[&str] =
    &["item", "items", "product", "products", "thing", "things", "cup", "cups", "unit", "units"];

/// Locale prefixes the rule lexicon covers well enough that the
/// generative pass is skipped entirely.
pub const RULE_PREFERRED_LOCALE_PREFIXES: &[&str] = &["hi", "es"];

/// Whether transcripts in `locale` should bypass the generative parser.
pub fn is_rule_preferred(locale: &str) -> bool {
    let folded = locale.trim().to_lowercase();
    RULE_PREFERRED_LOCALE_PREFIXES.iter().any(|prefix| folded.starts_with(prefix))
}
