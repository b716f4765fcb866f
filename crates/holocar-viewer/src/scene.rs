//! Scene graph assembly.
//!
//! Spawns the camera, the two shadow-casting lights and the fade overlay at
//! startup, starts loading the vehicle scene, and wires the named nodes of the
//! loaded scene to their materials once it has been instantiated.

use bevy::camera::{ClearColorConfig, Exposure};
use bevy::camera::visibility::NoFrustumCulling;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::light::{
    CascadeShadowConfigBuilder, DirectionalLightShadowMap, NotShadowCaster, NotShadowReceiver,
    ShadowFilteringMethod, light_consts::lux,
};
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;

use crate::{
    animation::AuthoredTilt,
    camera::{OrbitCamera, default_orbit_input_map},
    error::AssetStructureError,
    launch_params::LaunchParams,
    loading::AssetLoading,
    materials::{
        HOLOGRAM_SHADER_PATH, HologramMaterial, OVERLAY_SHADER_PATH, OverlayMaterial,
        ShowcaseMaterials,
    },
    settings::DebugSettings,
};

/// Name of the hologram car node.
pub const CAR_NODE: &str = "Car";
/// Name of the first base node.
pub const BASE_NODE: &str = "Base";
/// Name of the second base node.
pub const BASE_2_NODE: &str = "Base-2";

/// Uniform scale applied to the loaded scene.
pub const MODEL_SCALE: f32 = 0.6;

/// Vertical field of view in degrees.
const CAMERA_FOV_DEG: f32 = 75.0;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 100.0;
const CAMERA_POSITION: Vec3 = Vec3::new(3.0, 3.0, 3.0);

/// Renderer exposure multiplier on top of Bevy's default exposure.
const TONE_MAPPING_EXPOSURE: f32 = 1.5;

/// Positions of the two directional lights. Both aim at the origin.
const LIGHT_POSITIONS: [Vec3; 2] = [Vec3::new(-2.0, 10.0, -4.0), Vec3::new(2.0, -7.0, 4.0)];
/// Shared light intensity, scaled to lux.
const LIGHT_INTENSITY: f32 = 2.5;
const SHADOW_MAP_SIZE: usize = 1024;
const SHADOW_FAR: f32 = 15.0;
const SHADOW_NORMAL_BIAS: f32 = 0.05;

/// Plugin that builds the static scene and attaches the loaded model.
pub struct ShowcaseScenePlugin;

impl Plugin for ShowcaseScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(DirectionalLightShadowMap {
            size: SHADOW_MAP_SIZE,
        })
        .init_resource::<ShowcaseModel>()
        .add_systems(Startup, (setup_materials, setup_scene).chain())
        .add_observer(on_model_scene_ready);
    }
}

/// Marker for the root entity of the loaded vehicle scene.
#[derive(Component)]
pub struct ShowcaseRoot;

/// Marker for the car node once it has been found in the loaded scene.
#[derive(Component)]
pub struct ShowcaseCar;

/// Marker for the full-screen fade quad.
#[derive(Component)]
pub struct FadeOverlay;

/// The car node, once the scene file has been instantiated.
#[derive(Resource, Debug, Default)]
pub struct ShowcaseModel {
    pub car: Option<Entity>,
}

/// Create the live material instances from the initial settings.
fn setup_materials(
    mut commands: Commands,
    settings: Res<DebugSettings>,
    mut holograms: ResMut<Assets<HologramMaterial>>,
    mut standards: ResMut<Assets<StandardMaterial>>,
    mut overlays: ResMut<Assets<OverlayMaterial>>,
) {
    commands.insert_resource(ShowcaseMaterials {
        hologram: holograms.add(HologramMaterial::from_settings(&settings.hologram)),
        base: standards.add(settings.base.to_material()),
        base_2: standards.add(settings.base_2.to_material()),
        overlay: overlays.add(OverlayMaterial::opaque()),
    });
}

/// Spawn camera, lights and overlay, and start loading the model.
fn setup_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    params: Res<LaunchParams>,
    materials: Res<ShowcaseMaterials>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut loading: ResMut<AssetLoading>,
) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEG.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        Transform::from_translation(CAMERA_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        Tonemapping::AcesFitted,
        Exposure {
            ev100: Exposure::default().ev100 - TONE_MAPPING_EXPOSURE.log2(),
        },
        ShadowFilteringMethod::Gaussian,
        Msaa::Sample4,
        OrbitCamera::looking_at(CAMERA_POSITION, Vec3::ZERO),
        default_orbit_input_map(),
    ));

    for position in LIGHT_POSITIONS {
        commands.spawn((
            DirectionalLight {
                color: Color::WHITE,
                illuminance: LIGHT_INTENSITY * lux::OVERCAST_DAY,
                shadows_enabled: true,
                shadow_normal_bias: SHADOW_NORMAL_BIAS,
                ..default()
            },
            CascadeShadowConfigBuilder {
                num_cascades: 1,
                maximum_distance: SHADOW_FAR,
                ..default()
            }
            .build(),
            Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y),
        ));
    }

    commands.spawn((
        FadeOverlay,
        Mesh3d(meshes.add(Rectangle::new(2.0, 2.0))),
        MeshMaterial3d(materials.overlay.clone()),
        Transform::default(),
        NoFrustumCulling,
        NotShadowCaster,
        NotShadowReceiver,
    ));

    // Shaders are compiled lazily; loading them here lets the reveal wait for them.
    let hologram_shader: Handle<Shader> = asset_server.load(HOLOGRAM_SHADER_PATH);
    let overlay_shader: Handle<Shader> = asset_server.load(OVERLAY_SHADER_PATH);
    loading.track(HOLOGRAM_SHADER_PATH, &hologram_shader);
    loading.track(OVERLAY_SHADER_PATH, &overlay_shader);

    let scene: Handle<Scene> =
        asset_server.load(GltfAssetLabel::Scene(0).from_asset(params.model_path.clone()));
    loading.track(params.model_path.clone(), &scene);
    commands.spawn((
        ShowcaseRoot,
        SceneRoot(scene),
        Transform::from_scale(Vec3::splat(MODEL_SCALE)),
    ));

    tracing::info!("Scene setup complete, loading {}", params.model_path);
}

/// Pick the entity carrying `name` out of a set of named candidates.
pub fn find_node<'a>(
    candidates: impl IntoIterator<Item = (Entity, &'a str)>,
    name: &'static str,
) -> Result<Entity, AssetStructureError> {
    candidates
        .into_iter()
        .find_map(|(entity, candidate)| (candidate == name).then_some(entity))
        .ok_or(AssetStructureError::MissingNode { name })
}

/// Entities under `node` (inclusive) that carry a glTF standard material.
fn mesh_entities(
    node: Entity,
    children: &Query<&Children>,
    gltf_materials: &Query<(), With<MeshMaterial3d<StandardMaterial>>>,
) -> Vec<Entity> {
    std::iter::once(node)
        .chain(children.iter_descendants(node))
        .filter(|entity| gltf_materials.contains(*entity))
        .collect()
}

/// Attach materials to the named nodes once the vehicle scene is spawned.
fn on_model_scene_ready(
    trigger: On<SceneInstanceReady>,
    mut commands: Commands,
    mut model: ResMut<ShowcaseModel>,
    materials: Res<ShowcaseMaterials>,
    roots: Query<(), With<ShowcaseRoot>>,
    children: Query<&Children>,
    names: Query<(Entity, &Name)>,
    transforms: Query<&Transform>,
    gltf_materials: Query<(), With<MeshMaterial3d<StandardMaterial>>>,
) {
    let root = trigger.event_target();
    if !roots.contains(root) {
        return;
    }

    let named: Vec<(Entity, &str)> = children
        .iter_descendants(root)
        .filter_map(|entity| names.get(entity).ok())
        .map(|(entity, name)| (entity, name.as_str()))
        .collect();

    match find_node(named.iter().copied(), CAR_NODE) {
        Ok(car) => {
            let meshes = mesh_entities(car, &children, &gltf_materials);
            if meshes.is_empty() {
                tracing::error!("{}", AssetStructureError::NoMeshes { name: CAR_NODE });
            }
            for entity in meshes {
                commands
                    .entity(entity)
                    .remove::<MeshMaterial3d<StandardMaterial>>()
                    .insert((
                        MeshMaterial3d(materials.hologram.clone()),
                        NotShadowCaster,
                        NotShadowReceiver,
                    ));
            }
            let tilt = transforms
                .get(car)
                .map(|transform| AuthoredTilt::from_rotation(transform.rotation))
                .unwrap_or_default();
            commands
                .entity(car)
                .insert((ShowcaseCar, tilt, Visibility::Hidden));
            model.car = Some(car);
        }
        Err(err) => tracing::error!("{err}; the car will never be revealed"),
    }

    for (name, handle) in [
        (BASE_NODE, &materials.base),
        (BASE_2_NODE, &materials.base_2),
    ] {
        let node = match find_node(named.iter().copied(), name) {
            Ok(node) => node,
            Err(err) => {
                tracing::error!("{err}");
                continue;
            }
        };
        let meshes = mesh_entities(node, &children, &gltf_materials);
        if meshes.is_empty() {
            tracing::error!("{}", AssetStructureError::NoMeshes { name });
        }
        // Meshes cast and receive shadows unless marked otherwise.
        for entity in meshes {
            commands
                .entity(entity)
                .remove::<(MeshMaterial3d<StandardMaterial>, NotShadowCaster, NotShadowReceiver)>()
                .insert(MeshMaterial3d(handle.clone()));
        }
    }

    tracing::info!("Vehicle scene ready");
}
