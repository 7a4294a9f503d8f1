use crate::domain::activity::ActivityEntry;
use crate::domain::prompt::PromptLanguage;

struct PromptText {
    item_label: &'static str,
    unknown_item: &'static str,
    activities_heading: &'static str,
    activity_label: &'static str,
    time_label: &'static str,
    instructions: &'static str,
    heading_template: &'static str,
    fallback_item: &'static str,
    bullets: &'static str,
}

static INDONESIAN: PromptText = PromptText {
    item_label: "Nama barang hilang",
    unknown_item: "barang tidak diketahui",
    activities_heading: "Berikut daftar lokasi dan aktivitas saya:",
    activity_label: "aktivitas",
    time_label: "waktu",
    instructions: "Tolong analisis SEMUA lokasi di atas dan lakukan hal berikut:

1. Hitung tingkat kemungkinan barang hilang di SETIAP lokasi (risk estimation) berdasarkan:
   - jenis barang (jika diketahui)
   - jenis aktivitas
   - tingkat risiko aktivitas tersebut
   - durasi saya berada di lokasi
   - peluang barang berpindah atau terjatuh

2. URUTKAN semua lokasi dari kemungkinan tertinggi → terendah.

3. Tampilkan hasil dalam format berikut (WAJIB):",
    heading_template: "Berikut adalah lokasi-lokasi yang paling berpotensi menjadi tempat hilangnya {item}, disusun berdasarkan tingkat kemungkinan dari yang paling tinggi hingga paling rendah.",
    fallback_item: "barang tersebut",
    bullets: "• **Nama Lokasi Peringkat 1**, alasan singkat (ringkas, jelas, konteks risiko).
• **Nama Lokasi Peringkat 2**, alasan singkat.
• **Nama Lokasi Peringkat 3**, alasan singkat.
• **Nama Lokasi Peringkat 4**, alasan singkat.
• ... lanjutkan sampai lokasi terakhir.

PERATURAN FORMAT:
- SELURUH lokasi harus muncul (tanpa ada yang dilewati).
- Gunakan bullet \"•\" saja.
- Setiap bullet HARUS dimulai di baris baru.
- Dilarang menuliskan dua bullet dalam satu paragraf.
- Setelah setiap bullet, berikan 1 newline kosong.
- Jangan menghapus newline antar bullet.
- Jangan menggabungkan alasan bullet ke bullet lainnya.
- Tebalkan hanya nama lokasi, bukan alasannya.
- Jangan gunakan paragraf panjang; maksimal 3–5 baris per lokasi.
- Jangan sertakan alamat panjang, cukup nama lokasi singkat.",
};

static ENGLISH: PromptText = PromptText {
    item_label: "Lost item",
    unknown_item: "unknown item",
    activities_heading: "Here are the places I visited and what I did there:",
    activity_label: "activity",
    time_label: "time",
    instructions: "Please analyse ALL of the locations above and do the following:

1. Estimate how likely it is that the item was lost at EACH location (risk estimation) based on:
   - the type of item (if known)
   - the type of activity
   - how risky that activity is
   - how long I stayed at the location
   - the chance of the item shifting or falling

2. SORT all locations from most likely → least likely.

3. Present the result in exactly this format (REQUIRED):",
    heading_template: "These are the locations where the {item} was most likely lost, ordered from the highest likelihood to the lowest.",
    fallback_item: "item",
    bullets: "• **Rank 1 Location Name**, short reason (concise, clear, risk context).
• **Rank 2 Location Name**, short reason.
• **Rank 3 Location Name**, short reason.
• **Rank 4 Location Name**, short reason.
• ... continue until the last location.

FORMAT RULES:
- EVERY location must appear (none may be skipped).
- Use only the \"•\" bullet.
- Each bullet MUST start on a new line.
- Never put two bullets in one paragraph.
- Leave 1 empty line after every bullet.
- Do not remove the newlines between bullets.
- Do not merge the reason of one bullet into another.
- Bold only the location name, not the reason.
- No long paragraphs; at most 3–5 lines per location.
- Do not include full addresses, only the short location name.",
};

fn text_for(language: PromptLanguage) -> &'static PromptText {
    match language {
        PromptLanguage::Indonesian => &INDONESIAN,
        PromptLanguage::English => &ENGLISH,
    }
}

/// Blank names are treated like a missing name.
fn named_item(lost_item: Option<&str>) -> Option<&str> {
    lost_item.filter(|item| !item.trim().is_empty())
}

pub(crate) fn build_activity_line(
    index: usize,
    entry: &ActivityEntry,
    language: PromptLanguage,
) -> String {
    let text = text_for(language);
    format!(
        "{}. {} — {}: {}, {}: {}–{}",
        index + 1,
        entry.short_location(),
        text.activity_label,
        entry.activity,
        text.time_label,
        entry.start_time,
        entry.end_time
    )
}

/// Builds the ranking instruction sent to the model.
pub fn build_lost_item_prompt(
    activities: &[ActivityEntry],
    lost_item: Option<&str>,
    language: PromptLanguage,
) -> String {
    let text = text_for(language);
    let item = named_item(lost_item);

    let lines: Vec<String> = activities
        .iter()
        .enumerate()
        .map(|(index, entry)| build_activity_line(index, entry, language))
        .collect();

    let heading = text
        .heading_template
        .replace("{item}", item.unwrap_or(text.fallback_item));

    let mut body = String::new();
    body.push('\n');
    body.push_str(&format!(
        "{}: \"{}\".\n\n",
        text.item_label,
        item.unwrap_or(text.unknown_item)
    ));
    body.push_str(text.activities_heading);
    body.push('\n');
    body.push_str(&lines.join("\n"));
    body.push_str("\n\n");
    body.push_str(text.instructions);
    body.push_str("\n\n");
    body.push_str(&heading);
    body.push_str("\n\n");
    body.push_str(text.bullets);
    body.push('\n');
    body
}
