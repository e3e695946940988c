use serde::Serialize;

#[derive(Debug, PartialEq, Serialize)]
pub struct DiseaseInfo {
    pub description: &'static str,
    pub causes: &'static str,
    pub prevention: &'static [&'static str],
    pub treatment: &'static str,
}

/// Reference text for each class label the classifier can emit.
pub static DISEASES: &[(&str, DiseaseInfo)] = &[
    (
        "Cellulitis",
        DiseaseInfo {
            description: "Cellulitis is a common bacterial skin infection that causes redness, swelling, and pain in the affected area.",
            causes: "Usually caused by Streptococcus and Staphylococcus bacteria entering through a break in the skin.",
            prevention: &[
                "Keep skin clean and moisturized",
                "Treat cuts and wounds promptly",
                "Wear protective clothing when working outdoors",
                "Manage chronic conditions like diabetes",
            ],
            treatment: "Treatment typically involves antibiotics, rest, and elevation of the affected area. Severe cases may require hospitalization.",
        },
    ),
    (
        "Impetigo",
        DiseaseInfo {
            description: "Impetigo is a highly contagious skin infection that mainly affects infants and children, causing red sores that can break open and form a yellow-brown crust.",
            causes: "Caused by Staphylococcus aureus or Streptococcus pyogenes bacteria.",
            prevention: &[
                "Keep skin clean",
                "Cover cuts and scrapes",
                "Wash hands frequently",
                "Avoid sharing personal items",
            ],
            treatment: "Treatment includes topical or oral antibiotics, keeping the area clean, and covering the sores to prevent spread.",
        },
    ),
    (
        "Athelete-Foot",
        DiseaseInfo {
            description: "Athlete's foot is a fungal infection that usually begins between the toes, causing itching, burning, and cracked, blistered skin.",
            causes: "Caused by various types of fungi that thrive in warm, moist environments.",
            prevention: &[
                "Keep feet clean and dry",
                "Wear breathable shoes",
                "Change socks regularly",
                "Use antifungal powder",
            ],
            treatment: "Treatment includes antifungal medications, keeping feet dry, and wearing breathable footwear.",
        },
    ),
    (
        "Nail-Fungus",
        DiseaseInfo {
            description: "Nail fungus is a common condition that begins as a white or yellow spot under the tip of your fingernail or toenail.",
            causes: "Caused by various fungal organisms, most commonly dermatophytes.",
            prevention: &[
                "Keep nails clean and dry",
                "Wear shoes in public places",
                "Don't share nail tools",
                "Trim nails straight across",
            ],
            treatment: "Treatment options include oral antifungal medications, topical treatments, and in severe cases, nail removal.",
        },
    ),
    (
        "Ringworm",
        DiseaseInfo {
            description: "Ringworm is a fungal infection that causes a ring-shaped rash on the skin, which can be itchy and scaly.",
            causes: "Caused by various types of fungi that live on the skin, surfaces, and household items.",
            prevention: &[
                "Keep skin clean and dry",
                "Don't share personal items",
                "Wear shoes in public places",
                "Wash hands after touching animals",
            ],
            treatment: "Treatment includes antifungal creams, ointments, or oral medications depending on the severity.",
        },
    ),
    (
        "Cutaneous-larva-migrans",
        DiseaseInfo {
            description: "Cutaneous larva migrans is a skin infection caused by hookworm larvae that burrow into the skin, causing itchy, red, winding tracks.",
            causes: "Caused by hookworm larvae from infected animals, usually through contact with contaminated soil.",
            prevention: &[
                "Wear shoes outdoors",
                "Avoid walking barefoot in contaminated areas",
                "Keep pets dewormed",
                "Wash hands after handling soil",
            ],
            treatment: "Treatment includes antiparasitic medications and topical treatments to relieve itching.",
        },
    ),
    (
        "Chickenpox",
        DiseaseInfo {
            description: "Chickenpox is a highly contagious viral infection that causes an itchy, blister-like rash and flu-like symptoms.",
            causes: "Caused by the varicella-zoster virus.",
            prevention: &[
                "Get vaccinated",
                "Avoid contact with infected individuals",
                "Practice good hygiene",
                "Keep infected children home from school",
            ],
            treatment: "Treatment focuses on relieving symptoms with antihistamines, pain relievers, and keeping the skin clean. Antiviral medications may be prescribed for severe cases.",
        },
    ),
    (
        "Shingles",
        DiseaseInfo {
            description: "Shingles is a viral infection that causes a painful rash, usually appearing as a single stripe of blisters on one side of the body.",
            causes: "Caused by the reactivation of the varicella-zoster virus, the same virus that causes chickenpox.",
            prevention: &[
                "Get the shingles vaccine",
                "Maintain a healthy immune system",
                "Manage stress",
                "Get adequate rest",
            ],
            treatment: "Treatment includes antiviral medications, pain relievers, and topical treatments. Early treatment can help reduce complications.",
        },
    ),
];

pub fn disease_info(label: &str) -> Option<&'static DiseaseInfo> {
    DISEASES
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, info)| info)
}
