/*
 * Framework Recipes
 *
 * Safe, side-effect-free ways to obtain an instance of a framework type:
 * - Constructor with stand-in arguments: `new SurfaceView(ctx)`
 * - Static factory: `Camera.open()`, `AccountManager.get(ctx)`
 * - Static constant: `Bundle.EMPTY`
 * - Substitute: fabricate a concrete subtype (`Context` → `ContextWrapper`)
 *
 * Types with no entry fall back to package heuristics (widgets are built
 * with a context) and otherwise degrade in the registry.
 */

use rustc_hash::FxHashMap;

use crate::shared::models::TypeName;

/// Source of one recipe parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamSource {
    /// The ambient `android.content.Context`
    Context,
    /// `ambient(type)`
    Ambient(TypeName),
    /// Degenerate stand-in of the type (typed null)
    Degenerate(TypeName),
    /// Default value of a value type
    Value(TypeName),
}

/// How to fabricate a framework type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipe {
    Constructor(Vec<ParamSource>),
    StaticFactory {
        owner: TypeName,
        method: String,
        params: Vec<ParamSource>,
    },
    StaticField {
        owner: TypeName,
        field: String,
    },
    /// Fabricate this concrete subtype instead
    Substitute(TypeName),
    /// Needs native resources; always degenerate
    Unfabricable,
}

impl Recipe {
    fn factory(owner: &str, method: &str, params: Vec<ParamSource>) -> Self {
        Recipe::StaticFactory {
            owner: TypeName::new(owner),
            method: method.to_string(),
            params,
        }
    }

    fn field(owner: &str, field: &str) -> Self {
        Recipe::StaticField {
            owner: TypeName::new(owner),
            field: field.to_string(),
        }
    }
}

/// Packages whose concrete classes are views constructible from a context
const WIDGET_PACKAGES: &[&str] = &[
    "android.widget",
    "android.support.v7.widget",
    "androidx.appcompat.widget",
    "androidx.recyclerview.widget",
];

/// Widget-package classes that are not views
const NON_VIEW_SUFFIXES: &[&str] = &["Adapter", "Listener", "Watcher", "Callback", "Params"];

/// Registry of framework recipes and system service names
#[derive(Debug, Clone)]
pub struct FrameworkCatalog {
    recipes: FxHashMap<TypeName, Recipe>,
    services: FxHashMap<String, TypeName>,
}

impl FrameworkCatalog {
    /// Catalog with no entries; only heuristics apply
    pub fn empty() -> Self {
        Self {
            recipes: FxHashMap::default(),
            services: FxHashMap::default(),
        }
    }

    /// Built-in Android catalog
    pub fn android() -> Self {
        use ParamSource::*;

        let mut catalog = Self::empty();
        let ctx = || vec![Context];

        // Contexts: a wrapper around a null base never touches the runtime
        catalog.add("android.content.Context", Recipe::Substitute("android.content.ContextWrapper".into()));
        catalog.add(
            "android.content.ContextWrapper",
            Recipe::Constructor(vec![Degenerate(TypeName::context())]),
        );

        // Views
        catalog.add("android.view.View", Recipe::Constructor(ctx()));
        catalog.add("android.view.SurfaceView", Recipe::Constructor(ctx()));
        catalog.add("android.view.TextureView", Recipe::Constructor(ctx()));
        catalog.add("android.view.ViewGroup", Recipe::Substitute("android.widget.LinearLayout".into()));
        catalog.add("android.view.LayoutInflater", Recipe::factory("android.view.LayoutInflater", "from", ctx()));

        // Plain data holders
        catalog.add("android.os.Bundle", Recipe::field("android.os.Bundle", "EMPTY"));
        catalog.add("android.net.Uri", Recipe::field("android.net.Uri", "EMPTY"));
        catalog.add("android.content.Intent", Recipe::Constructor(Vec::new()));
        catalog.add("android.content.ContentValues", Recipe::Constructor(Vec::new()));
        catalog.add("android.content.res.Configuration", Recipe::Constructor(Vec::new()));
        catalog.add(
            "android.location.Location",
            Recipe::Constructor(vec![Value(TypeName::new("java.lang.String"))]),
        );
        catalog.add("android.os.Handler", Recipe::Constructor(Vec::new()));
        catalog.add("android.os.Looper", Recipe::factory("android.os.Looper", "getMainLooper", Vec::new()));
        catalog.add("java.lang.Object", Recipe::Constructor(Vec::new()));

        // Hardware and services
        catalog.add("android.hardware.Camera", Recipe::factory("android.hardware.Camera", "open", Vec::new()));
        catalog.add("android.accounts.AccountManager", Recipe::factory("android.accounts.AccountManager", "get", ctx()));
        catalog.add("android.telephony.SmsManager", Recipe::factory("android.telephony.SmsManager", "getDefault", Vec::new()));
        catalog.add("android.telephony.gsm.SmsManager", Recipe::factory("android.telephony.gsm.SmsManager", "getDefault", Vec::new()));
        catalog.add(
            "android.content.SharedPreferences",
            Recipe::factory("android.preference.PreferenceManager", "getDefaultSharedPreferences", ctx()),
        );
        catalog.add("android.graphics.Bitmap", Recipe::Unfabricable);
        catalog.add("android.hardware.Sensor", Recipe::Unfabricable);
        catalog.add("android.hardware.SensorEvent", Recipe::Unfabricable);

        for (name, ty) in [
            ("account", "android.accounts.AccountManager"),
            ("activity", "android.app.ActivityManager"),
            ("alarm", "android.app.AlarmManager"),
            ("audio", "android.media.AudioManager"),
            ("clipboard", "android.content.ClipboardManager"),
            ("connectivity", "android.net.ConnectivityManager"),
            ("keyguard", "android.app.KeyguardManager"),
            ("layout_inflater", "android.view.LayoutInflater"),
            ("location", "android.location.LocationManager"),
            ("notification", "android.app.NotificationManager"),
            ("phone", "android.telephony.TelephonyManager"),
            ("power", "android.os.PowerManager"),
            ("sensor", "android.hardware.SensorManager"),
            ("vibrator", "android.os.Vibrator"),
            ("wifi", "android.net.wifi.WifiManager"),
            ("window", "android.view.WindowManager"),
        ] {
            catalog.services.insert(name.to_string(), TypeName::new(ty));
        }

        catalog
    }

    fn add(&mut self, ty: &str, recipe: Recipe) {
        self.recipes.insert(TypeName::new(ty), recipe);
    }

    /// Add or replace a recipe
    pub fn with_recipe(mut self, ty: impl Into<TypeName>, recipe: Recipe) -> Self {
        self.recipes.insert(ty.into(), recipe);
        self
    }

    /// Add or replace a system service mapping
    pub fn with_service(mut self, name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        self.services.insert(name.into(), ty.into());
        self
    }

    /// Recipe for a type: explicit entry first, then widget heuristics
    pub fn recipe_for(&self, ty: &TypeName) -> Option<Recipe> {
        if let Some(recipe) = self.recipes.get(ty) {
            return Some(recipe.clone());
        }
        if self.is_view_type(ty) {
            return Some(Recipe::Constructor(vec![ParamSource::Context]));
        }
        None
    }

    /// Type registered for a `Context.getSystemService` name
    pub fn service_type(&self, name: &str) -> Option<&TypeName> {
        self.services.get(name)
    }

    /// Known system service names, sorted
    pub fn services(&self) -> Vec<(&str, &TypeName)> {
        let mut services: Vec<(&str, &TypeName)> = self
            .services
            .iter()
            .map(|(name, ty)| (name.as_str(), ty))
            .collect();
        services.sort_unstable();
        services
    }

    /// Whether `ty` is a view type constructible from a context
    pub fn is_view_type(&self, ty: &TypeName) -> bool {
        if ty == &TypeName::view() {
            return true;
        }
        let simple = ty.simple_name();
        if ty.package() == "android.view" {
            return simple.ends_with("View") || simple.ends_with("ViewGroup");
        }
        WIDGET_PACKAGES.contains(&ty.package())
            && simple != "Toast"
            && !NON_VIEW_SUFFIXES.iter().any(|suffix| simple.ends_with(suffix))
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl Default for FrameworkCatalog {
    fn default() -> Self {
        Self::android()
    }
}
