//! Page copy in the four supported languages.
//!
//! Every language is a `Translations` value, so a missing string is a compile
//! error rather than a blank spot on the page. String-keyed lookup is kept for
//! templates and falls back to the key itself.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Es, Language::Fr, Language::De];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Español",
            Language::Fr => "Français",
            Language::De => "Deutsch",
        }
    }

    pub fn translations(&self) -> &'static Translations {
        match self {
            Language::En => &EN,
            Language::Es => &ES,
            Language::Fr => &FR,
            Language::De => &DE,
        }
    }

    /// Looks `key` up in this language, returning the key when it is unknown.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        self.translations().get(key).unwrap_or(key)
    }
}

impl TryFrom<String> for Language {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            "fr" => Ok(Self::Fr),
            "de" => Ok(Self::De),
            other => Err(format!(
                "{} is not a supported language. Use one of `en`, `es`, `fr` or `de`.",
                other
            )),
        }
    }
}

#[derive(Debug)]
pub struct Translations {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub upload_text: &'static str,
    pub predict: &'static str,
    pub result: &'static str,
    pub normal: &'static str,
    pub tumor: &'static str,
    pub normal_guidance: &'static str,
    pub tumor_guidance: &'static str,
    pub consult_clinician: &'static str,
    pub confidence: &'static str,
    pub analyze_another: &'static str,
    pub analyzing: &'static str,
    pub clear_image: &'static str,
    pub server_online: &'static str,
    pub server_offline: &'static str,
    pub server_checking: &'static str,
    pub retry_connection: &'static str,
    pub invalid_file_type: &'static str,
    pub file_too_large: &'static str,
    pub analysis_failed: &'static str,
    pub about: &'static str,
    pub about_text: &'static str,
    pub how_it_works: &'static str,
    pub step1: &'static str,
    pub step1_desc: &'static str,
    pub step2: &'static str,
    pub step2_desc: &'static str,
    pub step3: &'static str,
    pub step3_desc: &'static str,
    pub kidney_facts: &'static str,
    pub fact1: &'static str,
    pub fact2: &'static str,
    pub fact3: &'static str,
    pub disclaimer: &'static str,
    pub disclaimer_text: &'static str,
    pub symptoms: &'static str,
    pub symptom1: &'static str,
    pub symptom2: &'static str,
    pub symptom3: &'static str,
    pub symptom4: &'static str,
    pub prevention: &'static str,
    pub tip1: &'static str,
    pub tip2: &'static str,
    pub tip3: &'static str,
    pub tip4: &'static str,
}

impl Translations {
    pub fn get(&self, key: &str) -> Option<&'static str> {
        let value = match key {
            "title" => self.title,
            "subtitle" => self.subtitle,
            "uploadText" => self.upload_text,
            "predict" => self.predict,
            "result" => self.result,
            "normal" => self.normal,
            "tumor" => self.tumor,
            "normalGuidance" => self.normal_guidance,
            "tumorGuidance" => self.tumor_guidance,
            "consultClinician" => self.consult_clinician,
            "confidence" => self.confidence,
            "analyzeAnother" => self.analyze_another,
            "analyzing" => self.analyzing,
            "clearImage" => self.clear_image,
            "serverOnline" => self.server_online,
            "serverOffline" => self.server_offline,
            "serverChecking" => self.server_checking,
            "retryConnection" => self.retry_connection,
            "invalidFileType" => self.invalid_file_type,
            "fileTooLarge" => self.file_too_large,
            "analysisFailed" => self.analysis_failed,
            "about" => self.about,
            "aboutText" => self.about_text,
            "howItWorks" => self.how_it_works,
            "step1" => self.step1,
            "step1Desc" => self.step1_desc,
            "step2" => self.step2,
            "step2Desc" => self.step2_desc,
            "step3" => self.step3,
            "step3Desc" => self.step3_desc,
            "kidneyFacts" => self.kidney_facts,
            "fact1" => self.fact1,
            "fact2" => self.fact2,
            "fact3" => self.fact3,
            "disclaimer" => self.disclaimer,
            "disclaimerText" => self.disclaimer_text,
            "symptoms" => self.symptoms,
            "symptom1" => self.symptom1,
            "symptom2" => self.symptom2,
            "symptom3" => self.symptom3,
            "symptom4" => self.symptom4,
            "prevention" => self.prevention,
            "tip1" => self.tip1,
            "tip2" => self.tip2,
            "tip3" => self.tip3,
            "tip4" => self.tip4,
            _ => return None,
        };
        Some(value)
    }
}

static EN: Translations = Translations {
    title: "Kidney Disease Classifier",
    subtitle: "A calm space to upload CT scans, hear friendly explanations, and prepare for your next conversation with a clinician.",
    upload_text: "Bring your CT scan here whenever you feel ready. We guide you in simple language.",
    predict: "Begin gentle analysis",
    result: "Personal insight",
    normal: "Kidney tissue looks typical",
    tumor: "Areas to discuss with your doctor",
    normal_guidance: "Good news: the analysis suggests normal kidney tissue. Continue regular check-ups to maintain kidney health.",
    tumor_guidance: "Important: this result indicates potential abnormalities.",
    consult_clinician: "Please consult with a healthcare professional for proper diagnosis and treatment.",
    confidence: "confidence",
    analyze_another: "Analyze another image",
    analyzing: "Processing CT scan image...",
    clear_image: "Remove image",
    server_online: "Server online",
    server_offline: "Server offline",
    server_checking: "Checking server...",
    retry_connection: "Retry connection",
    invalid_file_type: "Invalid file type. Please select an image file.",
    file_too_large: "File too large. Please select an image smaller than 10MB.",
    analysis_failed: "Analysis failed",
    about: "About Kidney Health",
    about_text: "Learn how your kidneys protect you, what warning signs to watch for, and why compassionate monitoring matters.",
    how_it_works: "How It Works",
    step1: "Upload CT Scan",
    step1_desc: "Choose a CT scan image from your device at your own pace.",
    step2: "AI Analysis",
    step2_desc: "Our assistant reviews the image and highlights anything unusual.",
    step3: "Get Results",
    step3_desc: "Read a clear summary with suggested next steps for loved ones and clinicians.",
    kidney_facts: "Kidney Facts",
    fact1: "Kidneys filter 120-150 quarts of blood daily",
    fact2: "Each kidney contains about 1 million nephrons",
    fact3: "Early detection can prevent kidney failure",
    disclaimer: "Medical Disclaimer",
    disclaimer_text: "This tool is for educational purposes only and should not replace professional medical diagnosis.",
    symptoms: "Common Symptoms",
    symptom1: "Changes in urination",
    symptom2: "Fatigue and weakness",
    symptom3: "Swelling in legs or feet",
    symptom4: "Persistent back pain",
    prevention: "Prevention Tips",
    tip1: "Stay hydrated with plenty of water",
    tip2: "Maintain a healthy diet",
    tip3: "Exercise regularly",
    tip4: "Avoid smoking and excessive alcohol",
};

static ES: Translations = Translations {
    title: "Clasificador de Enfermedad Renal",
    subtitle: "Un espacio tranquilo para subir tomografías, recibir explicaciones cercanas y prepararte para hablar con tu médico.",
    upload_text: "Trae tu tomografía cuando te sientas listo; te acompañamos con lenguaje sencillo.",
    predict: "Iniciar análisis amable",
    result: "Guía personal",
    normal: "El tejido renal luce habitual",
    tumor: "Zonas para conversar con tu médico",
    normal_guidance: "Buenas noticias: el análisis sugiere tejido renal normal. Continúa con tus revisiones periódicas.",
    tumor_guidance: "Importante: este resultado indica posibles anomalías.",
    consult_clinician: "Consulta a un profesional de la salud para un diagnóstico y tratamiento adecuados.",
    confidence: "confianza",
    analyze_another: "Analizar otra imagen",
    analyzing: "Procesando la tomografía...",
    clear_image: "Quitar imagen",
    server_online: "Servidor en línea",
    server_offline: "Servidor desconectado",
    server_checking: "Comprobando el servidor...",
    retry_connection: "Reintentar conexión",
    invalid_file_type: "Tipo de archivo no válido. Selecciona una imagen.",
    file_too_large: "Archivo demasiado grande. Selecciona una imagen de menos de 10MB.",
    analysis_failed: "El análisis falló",
    about: "Sobre la Salud Renal",
    about_text: "Descubre cómo tus riñones te protegen, qué señales vigilar y por qué un seguimiento compasivo es importante.",
    how_it_works: "Cómo Funciona",
    step1: "Subir Tomografía",
    step1_desc: "Elige una imagen de tu dispositivo cuando lo desees.",
    step2: "Análisis de IA",
    step2_desc: "El asistente revisa la imagen y destaca lo relevante.",
    step3: "Obtener Resultados",
    step3_desc: "Lee un resumen claro con pasos sugeridos para tu círculo y tu médico.",
    kidney_facts: "Datos Renales",
    fact1: "Los riñones filtran 120-150 litros de sangre diariamente",
    fact2: "Cada riñón contiene aproximadamente 1 millón de nefronas",
    fact3: "La detección temprana puede prevenir la insuficiencia renal",
    disclaimer: "Descargo Médico",
    disclaimer_text: "Esta herramienta es solo para fines educativos y no debe reemplazar el diagnóstico médico profesional.",
    symptoms: "Síntomas Comunes",
    symptom1: "Cambios en la micción",
    symptom2: "Fatiga y debilidad",
    symptom3: "Hinchazón en piernas o pies",
    symptom4: "Dolor persistente de espalda",
    prevention: "Consejos de Prevención",
    tip1: "Mantente hidratado con abundante agua",
    tip2: "Mantén una dieta saludable",
    tip3: "Ejercítate regularmente",
    tip4: "Evita fumar y el alcohol excesivo",
};

static FR: Translations = Translations {
    title: "Classificateur de Maladie Rénale",
    subtitle: "Un lieu apaisant pour déposer vos scanners, obtenir des explications bienveillantes et vous préparer à échanger avec votre médecin.",
    upload_text: "Importez votre scanner quand vous vous sentez prêt : nous vous guidons avec des mots simples.",
    predict: "Lancer l’analyse en douceur",
    result: "Point personnalisé",
    normal: "Le tissu rénal paraît habituel",
    tumor: "Zones à discuter avec un professionnel",
    normal_guidance: "Bonne nouvelle : l’analyse suggère un tissu rénal normal. Poursuivez vos contrôles réguliers.",
    tumor_guidance: "Important : ce résultat indique de possibles anomalies.",
    consult_clinician: "Veuillez consulter un professionnel de santé pour un diagnostic et un traitement adaptés.",
    confidence: "confiance",
    analyze_another: "Analyser une autre image",
    analyzing: "Analyse du scanner en cours...",
    clear_image: "Retirer l’image",
    server_online: "Serveur en ligne",
    server_offline: "Serveur hors ligne",
    server_checking: "Vérification du serveur...",
    retry_connection: "Réessayer la connexion",
    invalid_file_type: "Type de fichier invalide. Veuillez choisir une image.",
    file_too_large: "Fichier trop volumineux. Veuillez choisir une image de moins de 10 Mo.",
    analysis_failed: "L’analyse a échoué",
    about: "À Propos de la Santé Rénale",
    about_text: "Comprenez comment vos reins vous protègent, les signaux d’alerte et l’importance d’un suivi empathique.",
    how_it_works: "Comment Ça Marche",
    step1: "Télécharger le Scanner",
    step1_desc: "Choisissez une image sur votre appareil à votre rythme.",
    step2: "Analyse IA",
    step2_desc: "L’assistant examine l’image et met en lumière les points clés.",
    step3: "Obtenir les Résultats",
    step3_desc: "Recevez un résumé clair avec des prochaines étapes pour vos proches et votre médecin.",
    kidney_facts: "Faits Rénaux",
    fact1: "Les reins filtrent 120-150 litres de sang quotidiennement",
    fact2: "Chaque rein contient environ 1 million de néphrons",
    fact3: "La détection précoce peut prévenir l'insuffisance rénale",
    disclaimer: "Avertissement Médical",
    disclaimer_text: "Cet outil est destiné à l’éducation et ne remplace pas un diagnostic médical professionnel.",
    symptoms: "Symptômes Courants",
    symptom1: "Changements dans la miction",
    symptom2: "Fatigue et faiblesse",
    symptom3: "Gonflement des jambes ou des pieds",
    symptom4: "Douleur dorsale persistante",
    prevention: "Conseils de Prévention",
    tip1: "Restez hydraté avec beaucoup d'eau",
    tip2: "Maintenez une alimentation saine",
    tip3: "Bougez régulièrement",
    tip4: "Évitez le tabac et l’alcool excessif",
};

static DE: Translations = Translations {
    title: "Nierenkrankheits-Klassifikator",
    subtitle: "Ein ruhiger Ort, um CT-Bilder hochzuladen, verständliche Erklärungen zu erhalten und sich auf das Gespräch mit Ärzt:innen vorzubereiten.",
    upload_text: "Laden Sie Ihren Scan hoch, wenn es sich gut anfühlt. Wir begleiten Sie mit klaren Worten.",
    predict: "Sanfte Analyse starten",
    result: "Persönlicher Hinweis",
    normal: "Nierengewebe wirkt unauffällig",
    tumor: "Bereiche für das Gespräch mit der Praxis",
    normal_guidance: "Gute Nachricht: Die Analyse deutet auf normales Nierengewebe hin. Bleiben Sie bei regelmäßigen Kontrollen.",
    tumor_guidance: "Wichtig: Dieses Ergebnis weist auf mögliche Auffälligkeiten hin.",
    consult_clinician: "Bitte wenden Sie sich für Diagnose und Behandlung an medizinisches Fachpersonal.",
    confidence: "Konfidenz",
    analyze_another: "Weiteres Bild analysieren",
    analyzing: "CT-Bild wird verarbeitet...",
    clear_image: "Bild entfernen",
    server_online: "Server online",
    server_offline: "Server offline",
    server_checking: "Server wird geprüft...",
    retry_connection: "Verbindung erneut prüfen",
    invalid_file_type: "Ungültiger Dateityp. Bitte wählen Sie ein Bild.",
    file_too_large: "Datei zu groß. Bitte wählen Sie ein Bild unter 10 MB.",
    analysis_failed: "Analyse fehlgeschlagen",
    about: "Über Nierengesundheit",
    about_text: "Erfahren Sie, wie die Nieren schützen, welche Signale wichtig sind und warum ein einfühlsames Monitoring zählt.",
    how_it_works: "Wie es Funktioniert",
    step1: "CT-Scan Hochladen",
    step1_desc: "Wählen Sie ein Bild von Ihrem Gerät, ganz in Ruhe.",
    step2: "KI-Analyse",
    step2_desc: "Der Assistent prüft das Bild und hebt Auffälligkeiten hervor.",
    step3: "Ergebnisse Erhalten",
    step3_desc: "Lesen Sie eine verständliche Zusammenfassung mit nächsten Schritten.",
    kidney_facts: "Nierenfakten",
    fact1: "Nieren filtern täglich 120-150 Liter Blut",
    fact2: "Jede Niere enthält etwa 1 Million Nephrone",
    fact3: "Früherkennung kann Nierenversagen verhindern",
    disclaimer: "Medizinischer Hinweis",
    disclaimer_text: "Dieses Werkzeug dient Bildungszwecken und ersetzt keine ärztliche Diagnose.",
    symptoms: "Häufige Symptome",
    symptom1: "Veränderungen beim Wasserlassen",
    symptom2: "Müdigkeit und Schwäche",
    symptom3: "Schwellungen an Beinen oder Füßen",
    symptom4: "Anhaltende Rückenschmerzen",
    prevention: "Präventionsratschläge",
    tip1: "Viel Wasser trinken",
    tip2: "Ausgewogen ernähren",
    tip3: "Regelmäßig bewegen",
    tip4: "Rauchen und übermäßigen Alkohol meiden",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_key() {
        assert_eq!(Language::En.t("predict"), "Begin gentle analysis");
        assert_eq!(Language::De.t("title"), "Nierenkrankheits-Klassifikator");
        assert_eq!(Language::Es.t("tumor"), "Zonas para conversar con tu médico");
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        for language in Language::ALL {
            assert_eq!(language.t("noSuchKey"), "noSuchKey");
        }
    }

    #[test]
    fn test_every_language_answers_every_key() {
        let keys = [
            "title", "subtitle", "uploadText", "predict", "result", "normal", "tumor",
            "normalGuidance", "tumorGuidance", "consultClinician", "confidence",
            "analyzeAnother", "analyzing", "clearImage", "serverOnline", "serverOffline",
            "serverChecking", "retryConnection", "invalidFileType", "fileTooLarge",
            "analysisFailed", "about", "aboutText", "howItWorks", "step1", "step1Desc",
            "step2", "step2Desc", "step3", "step3Desc", "kidneyFacts", "fact1", "fact2",
            "fact3", "disclaimer", "disclaimerText", "symptoms", "symptom1", "symptom2",
            "symptom3", "symptom4", "prevention", "tip1", "tip2", "tip3", "tip4",
        ];
        for language in Language::ALL {
            for key in keys {
                let value = language
                    .translations()
                    .get(key)
                    .unwrap_or_else(|| panic!("{} missing in {}", key, language.as_str()));
                assert!(!value.is_empty(), "{} empty in {}", key, language.as_str());
            }
        }
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!(Language::try_from("FR".to_string()), Ok(Language::Fr));
        assert_eq!(Language::try_from(" de ".to_string()), Ok(Language::De));
        assert!(Language::try_from("it".to_string()).is_err());
    }
}
